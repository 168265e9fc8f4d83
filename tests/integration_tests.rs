//! Integration tests for the treasure-hunt server and client
//!
//! These tests run the real listener, dispatcher and handlers over loopback TCP.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::sleep;
use treasure_client::network::Client;
use treasure_server::board::Board;
use treasure_server::dispatcher::{Dispatcher, DispatcherHandle};
use treasure_server::network::Server;
use treasure_shared::{PickResult, Tile};

async fn start_server(size: usize, treasure_levels: usize, seed: u64) -> (SocketAddr, DispatcherHandle) {
    let mut rng = StdRng::seed_from_u64(seed);
    let board = Board::with_rng(size, treasure_levels, &mut rng).unwrap();
    let (dispatcher, _task) = Dispatcher::spawn(board);

    let server = Server::bind("127.0.0.1:0", dispatcher.clone()).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    (addr, dispatcher)
}

/// Tiles holding treasure, read from the rendered board
fn treasure_tiles(board: &str) -> Vec<(Tile, u32)> {
    board
        .lines()
        .enumerate()
        .flat_map(|(r, line)| {
            line.split(' ')
                .enumerate()
                .filter_map(move |(c, cell)| {
                    cell.parse::<u32>()
                        .ok()
                        .map(|value| (Tile::new(r as u8, c as u8), value))
                })
        })
        .collect()
}

async fn wait_for_seated(dispatcher: &DispatcherHandle, seated: usize) {
    for _ in 0..200 {
        if dispatcher.snapshot().await.unwrap().seated == seated {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("roster never reached {} seated players", seated);
}

/// HANDSHAKE AND WIRE FORMAT TESTS
mod protocol_tests {
    use super::*;

    /// Players are named after their seats in connection order
    #[tokio::test]
    async fn handshake_assigns_seat_names() {
        let (addr, _dispatcher) = start_server(4, 2, 1).await;

        let one = Client::connect(&addr.to_string()).await.unwrap();
        let two = Client::connect(&addr.to_string()).await.unwrap();

        assert_eq!(one.name(), "One");
        assert_eq!(two.name(), "Two");
    }

    /// Raw bytes on the socket match the fixed-width framing
    #[tokio::test]
    async fn raw_handshake_and_out_of_bounds_pick() {
        let (addr, _dispatcher) = start_server(4, 2, 2).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let mut greeting = [0u8; 5];
        stream.read_exact(&mut greeting).await.unwrap();
        assert_eq!(&greeting, &[0x00, 0x03, b'O', b'n', b'e']);

        // (3, 9) is off a 4x4 board
        stream.write_all(&[0x39]).await.unwrap();
        let mut result = [0u8; 2];
        stream.read_exact(&mut result).await.unwrap();
        assert_eq!(result, [0xC0, 0x00]);
    }

    /// A third connection is closed while both seats are taken
    #[tokio::test]
    async fn full_roster_rejects_connection() {
        let (addr, _dispatcher) = start_server(4, 2, 3).await;
        let _one = Client::connect(&addr.to_string()).await.unwrap();
        let _two = Client::connect(&addr.to_string()).await.unwrap();

        let rejected = Client::connect(&addr.to_string()).await;
        match rejected {
            Err(e) => assert!(e.is_disconnect()),
            Ok(client) => panic!("third client was seated as {}", client.name()),
        }
    }
}

/// GAME LOGIC INTEGRATION TESTS
mod game_logic_tests {
    use super::*;

    /// The second pick of a tile scores nothing and only the first picker gains
    #[tokio::test]
    async fn same_tile_picked_by_both_players() {
        let (addr, dispatcher) = start_server(6, 4, 4).await;
        let mut one = Client::connect(&addr.to_string()).await.unwrap();
        let mut two = Client::connect(&addr.to_string()).await.unwrap();

        let board = dispatcher.snapshot().await.unwrap().board;
        let (tile, value) = treasure_tiles(&board)[0];

        let first = one.pick(tile).await.unwrap();
        let second = two.pick(tile).await.unwrap();

        let expected = PickResult::Scores {
            player_one: value,
            player_two: 0,
        };
        assert_eq!(first, expected);
        assert_eq!(second, expected);
    }

    /// Clearing the whole board awards exactly the hidden treasure
    #[tokio::test]
    async fn complete_game_awards_all_treasure() {
        let (addr, dispatcher) = start_server(4, 3, 5).await;
        let mut one = Client::connect(&addr.to_string()).await.unwrap();
        let mut two = Client::connect(&addr.to_string()).await.unwrap();

        let mut last = PickResult::OutOfBounds;
        for row in 0..4u8 {
            for col in 0..4u8 {
                let client = if (row + col) % 2 == 0 { &mut one } else { &mut two };
                last = client.pick(Tile::new(row, col)).await.unwrap();
            }
        }

        let snapshot = dispatcher.snapshot().await.unwrap();
        assert_eq!(snapshot.remaining_treasure, 0);
        let (player_one, player_two) = snapshot.scores;
        // 1 + 2*2 + 3*3
        assert_eq!(player_one + player_two, 14);
        assert_eq!(
            last,
            PickResult::Scores {
                player_one,
                player_two,
            }
        );
    }
}

/// DISCONNECT AND CONCURRENCY TESTS
mod client_server_tests {
    use super::*;

    /// An empty read closes one session, frees its seat and leaves the other player alone
    #[tokio::test]
    async fn disconnect_frees_seat_without_disturbing_other_player() {
        let (addr, dispatcher) = start_server(6, 3, 6).await;
        let mut raw = TcpStream::connect(addr).await.unwrap();
        let mut greeting = [0u8; 5];
        raw.read_exact(&mut greeting).await.unwrap();
        let mut two = Client::connect(&addr.to_string()).await.unwrap();
        assert_eq!(two.name(), "Two");

        raw.shutdown().await.unwrap();
        drop(raw);
        wait_for_seated(&dispatcher, 1).await;

        let board = dispatcher.snapshot().await.unwrap().board;
        let (tile, value) = treasure_tiles(&board)[0];
        let result = two.pick(tile).await.unwrap();
        assert_eq!(
            result,
            PickResult::Scores {
                player_one: 0,
                player_two: value,
            }
        );

        let replacement = Client::connect(&addr.to_string()).await.unwrap();
        assert_eq!(replacement.name(), "One");
    }

    /// Concurrent picks from both players are serialized by the dispatcher
    #[tokio::test]
    async fn concurrent_players_clear_board() {
        let (addr, dispatcher) = start_server(16, 6, 7).await;
        let one = Client::connect(&addr.to_string()).await.unwrap();
        let two = Client::connect(&addr.to_string()).await.unwrap();

        let tasks: Vec<_> = [one, two]
            .into_iter()
            .map(|mut client| {
                tokio::spawn(async move {
                    for row in 0..16u8 {
                        for col in 0..16u8 {
                            client.pick(Tile::new(row, col)).await.unwrap();
                        }
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        let snapshot = dispatcher.snapshot().await.unwrap();
        assert_eq!(snapshot.remaining_treasure, 0);
        // 1 + 4 + 9 + 16 + 25 + 36
        assert_eq!(snapshot.scores.0 + snapshot.scores.1, 91);
    }

    /// Resetting the board hides fresh treasure for connected players
    #[tokio::test]
    async fn reset_restores_treasure() {
        let (addr, dispatcher) = start_server(4, 2, 8).await;
        let mut one = Client::connect(&addr.to_string()).await.unwrap();

        let board = dispatcher.snapshot().await.unwrap().board;
        for (tile, _) in treasure_tiles(&board) {
            one.pick(tile).await.unwrap();
        }
        assert_eq!(dispatcher.snapshot().await.unwrap().remaining_treasure, 0);

        dispatcher.reset().await.unwrap();
        let snapshot = dispatcher.snapshot().await.unwrap();
        assert_eq!(snapshot.remaining_treasure, 5);
        assert_eq!(snapshot.scores, (5, 0));
    }
}
