//! # Treasure Hunt Client Library
//!
//! Terminal client for the treasure-hunt server. It connects over TCP, learns which
//! player seat it was given, then repeatedly asks the user for a tile and prints the
//! scores the server sends back.
//!
//! ## Module Organization
//!
//! ### Input Module (`input`)
//! Prompts for a row and a column, re-prompting on empty or invalid entries, and
//! turns valid pairs into wire-ready tiles.
//!
//! ### Network Module (`network`)
//! Owns the socket: reads the name announcement, sends pick bytes and decodes the
//! two-byte results. A short read means the server went away.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use treasure_client::input::InputReader;
//! use treasure_client::network::Client;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("127.0.0.1:12345").await?;
//!     println!("Player Name: {}", client.name());
//!
//!     let mut input = InputReader::new(BufReader::new(tokio::io::stdin()));
//!     client.run(&mut input, &mut tokio::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod input;
pub mod network;
