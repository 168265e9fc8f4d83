//! # Treasure Hunt Server Library
//!
//! Authoritative server for a two-player treasure hunt played over raw TCP. A square
//! board hides numeric treasure; clients pick tiles by coordinate and the server
//! reveals the value, adds it to the picker's score and clears the tile.
//!
//! ## Architecture Design
//!
//! ### Single Owner of Game State
//! One dispatcher task owns the board and the player roster. Every mutation arrives
//! as a command on an unbounded channel and is applied in arrival order, so no locks
//! are needed and simultaneous picks of the same tile resolve deterministically: the
//! first one scores, the second finds the tile empty.
//!
//! ### Task per Connection
//! The listener accepts sockets, asks the dispatcher for a seat and hands the socket
//! to a connection handler task. Handlers do all socket I/O; the dispatcher never
//! blocks on a client. A handler that hits a short read, a failed write or a panic
//! ends its own session and gives its seat back without disturbing anyone else.
//!
//! ### Per-Connection Responses
//! Each seated connection registers its own response channel with the dispatcher.
//! Results for a connection that already left are dropped with its channel.
//!
//! ## Module Organization
//!
//! - `board`: treasure grid, random wrapped placement, tile picking
//! - `player`: players and the fixed two-seat roster
//! - `dispatcher`: the game state owner and its command protocol
//! - `connection`: per-client session loop
//! - `network`: TCP listener and handshake
//! - `config`: startup board parameters
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use treasure_server::config::GameConfig;
//! use treasure_server::dispatcher::Dispatcher;
//! use treasure_server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let board = GameConfig::default().build_board()?;
//!     let (dispatcher, _task) = Dispatcher::spawn(board);
//!
//!     let server = Server::bind("0.0.0.0:12345", dispatcher).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod network;
pub mod player;

pub use error::GameError;

/// Server-assigned identifier of an accepted connection
pub type ConnectionId = u32;
