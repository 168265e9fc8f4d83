//! Treasure board and its random placement algorithm.
//!
//! A board of size `n` holds treasure labels `1..=t`. Label `L` occupies exactly `L`
//! cells laid out in a straight line that wraps around the board edges, so the total
//! number of treasure cells is the triangular number `t * (t + 1) / 2`.

use crate::error::GameError;
use rand::Rng;
use std::fmt;

/// Attempts allowed per label before the layout is started over.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

/// Full layouts tried before construction fails.
pub const MAX_LAYOUT_RESTARTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Square grid of hidden treasure. `None` marks an empty cell.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    treasure_levels: usize,
    cells: Vec<Option<u32>>,
}

impl Board {
    /// Builds a board and places treasure using the thread-local RNG.
    pub fn new(size: usize, treasure_levels: usize) -> Result<Self, GameError> {
        Self::with_rng(size, treasure_levels, &mut rand::thread_rng())
    }

    /// Builds a board and places treasure with the given RNG.
    ///
    /// Fails with [`GameError::Configuration`] when `size < 2`, when `treasure_levels`
    /// is zero or larger than `size`, or when no complete layout is found within
    /// [`MAX_LAYOUT_RESTARTS`] tries.
    pub fn with_rng<R: Rng + ?Sized>(
        size: usize,
        treasure_levels: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if size < 2 {
            return Err(GameError::Configuration(format!(
                "board size must be at least 2, got {}",
                size
            )));
        }
        if treasure_levels == 0 {
            return Err(GameError::Configuration(
                "treasure levels must be greater than 0".to_string(),
            ));
        }
        if treasure_levels > size {
            return Err(GameError::Configuration(format!(
                "treasure levels ({}) cannot exceed board size ({})",
                treasure_levels, size
            )));
        }

        let mut board = Self {
            size,
            treasure_levels,
            cells: vec![None; size * size],
        };
        board.place_treasure(rng)?;
        Ok(board)
    }

    fn place_treasure<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        for _ in 0..MAX_LAYOUT_RESTARTS {
            if self.try_layout(rng) {
                return Ok(());
            }
            self.cells.fill(None);
        }

        Err(GameError::Configuration(format!(
            "could not lay out {} treasure levels on a {}x{} board",
            self.treasure_levels, self.size, self.size
        )))
    }

    /// Places every label from the largest down. Returns false if some label found
    /// no free run within [`MAX_PLACEMENT_ATTEMPTS`] tries.
    fn try_layout<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        for label in (1..=self.treasure_levels).rev() {
            let placed = (0..MAX_PLACEMENT_ATTEMPTS).any(|_| {
                let row = rng.gen_range(0..self.size);
                let col = rng.gen_range(0..self.size);
                let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                self.try_place(label, row, col, direction)
            });

            if !placed {
                return false;
            }
        }
        true
    }

    /// Walks `label` cells from `(row, col)` and fills them if every one is empty.
    fn try_place(&mut self, label: usize, row: usize, col: usize, direction: Direction) -> bool {
        let (dr, dc) = direction.delta();
        let n = self.size as isize;

        let mut positions = Vec::with_capacity(label);
        for step in 0..label as isize {
            let r = (row as isize + dr * step).rem_euclid(n) as usize;
            let c = (col as isize + dc * step).rem_euclid(n) as usize;
            if self.cells[self.index(r, c)].is_some() {
                return false;
            }
            positions.push(self.index(r, c));
        }

        for idx in positions {
            self.cells[idx] = Some(label as u32);
        }
        true
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn treasure_levels(&self) -> usize {
        self.treasure_levels
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// Label at `(row, col)`; `None` for empty or off-board tiles.
    pub fn cell(&self, row: usize, col: usize) -> Option<u32> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[self.index(row, col)]
    }

    /// Reveals and clears a tile, returning its value (0 when already empty).
    pub fn pick(&mut self, row: usize, col: usize) -> Result<u32, GameError> {
        if !self.in_bounds(row, col) {
            return Err(GameError::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }

        let idx = self.index(row, col);
        Ok(self.cells[idx].take().unwrap_or(0))
    }

    pub fn treasure_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Sum of all values still hidden on the board.
    pub fn remaining_treasure(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_cleared(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Human-readable grid used for server-side diagnostics.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .cells
            .chunks(self.size)
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(label) => label.to_string(),
                        None => "-".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        write!(f, "{}", rows.join("\n"))
    }
}
