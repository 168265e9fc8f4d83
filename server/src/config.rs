use crate::board::Board;
use crate::error::GameError;
use treasure_shared::MAX_AXIS;

pub const DEFAULT_BOARD_SIZE: usize = 10;
pub const DEFAULT_TREASURE_LEVELS: usize = 4;

/// Board parameters chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub size: usize,
    pub treasure_levels: usize,
}

impl GameConfig {
    pub fn new(size: usize, treasure_levels: usize) -> Self {
        Self {
            size,
            treasure_levels,
        }
    }

    /// Checks limits imposed by the wire format on top of the board's own rules
    pub fn validate(&self) -> Result<(), GameError> {
        if self.size > MAX_AXIS as usize {
            return Err(GameError::Configuration(format!(
                "board size {} cannot be addressed by single-byte picks (max {})",
                self.size, MAX_AXIS
            )));
        }
        Ok(())
    }

    pub fn build_board(&self) -> Result<Board, GameError> {
        self.validate()?;
        Board::new(self.size, self.treasure_levels)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE, DEFAULT_TREASURE_LEVELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.size, 10);
        assert_eq!(config.treasure_levels, 4);

        let board = config.build_board().unwrap();
        assert_eq!(board.treasure_cell_count(), 10);
    }

    #[test]
    fn test_largest_addressable_board() {
        let board = GameConfig::new(16, 16).build_board().unwrap();
        assert_eq!(board.size(), 16);
    }

    #[test]
    fn test_rejects_board_wider_than_wire_format() {
        assert!(matches!(
            GameConfig::new(17, 4).build_board(),
            Err(GameError::Configuration(_))
        ));
    }

    #[test]
    fn test_board_rules_still_apply() {
        assert!(GameConfig::new(1, 1).build_board().is_err());
        assert!(GameConfig::new(5, 0).build_board().is_err());
        assert!(GameConfig::new(5, 6).build_board().is_err());
    }
}
