//! Performance benchmarks for critical game systems

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use treasure_server::board::Board;
use treasure_server::dispatcher::{Dispatcher, PickRequest};
use treasure_shared::{PickResult, Tile};

/// Benchmarks board generation on the largest addressable board
#[test]
fn benchmark_board_generation() {
    let mut rng = StdRng::seed_from_u64(1);
    let iterations = 200;
    let start = Instant::now();

    for _ in 0..iterations {
        let board = Board::with_rng(16, 16, &mut rng).unwrap();
        assert_eq!(board.treasure_cell_count(), 136);
    }

    let duration = start.elapsed();
    println!(
        "Board generation: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 5 seconds
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks pick and result encoding
#[test]
fn benchmark_wire_codec() {
    let iterations = 100_000u32;
    let start = Instant::now();

    for i in 0..iterations {
        let tile = Tile::new((i % 16) as u8, ((i / 16) % 16) as u8);
        let byte = tile.encode().unwrap();
        assert_eq!(Tile::decode(byte), tile);

        let result = PickResult::Scores {
            player_one: i % 128,
            player_two: (i / 128) % 128,
        };
        assert_eq!(PickResult::decode(result.encode()), result);
    }

    let duration = start.elapsed();
    println!(
        "Wire codec: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 500ms
    assert!(duration.as_millis() < 500);
}

/// Benchmarks the dispatcher's pick path
#[test]
fn benchmark_dispatcher_picks() {
    let mut rng = StdRng::seed_from_u64(2);
    let board = Board::with_rng(16, 8, &mut rng).unwrap();
    let mut dispatcher = Dispatcher::new(board);
    let seating = dispatcher.join(1).unwrap();

    let iterations = 100_000usize;
    let start = Instant::now();

    for i in 0..iterations {
        let request = PickRequest {
            connection_id: 1,
            row: i % 17,
            col: (i / 17) % 17,
            slot: seating.slot,
        };
        let _ = dispatcher.apply_pick(&request);
    }

    let duration = start.elapsed();
    println!(
        "Dispatcher picks: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Every tile was visited, so all treasure is collected
    assert_eq!(dispatcher.snapshot().remaining_treasure, 0);
    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}
