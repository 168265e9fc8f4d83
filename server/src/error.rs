use std::io;
use thiserror::Error;
use treasure_shared::ProtocolError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("tile ({row}, {col}) is outside the {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("board dispatcher has stopped")]
    DispatcherStopped,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
