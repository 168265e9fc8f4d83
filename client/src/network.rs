//! Client connection: handshake, picks and the interactive loop

use crate::input::InputReader;
use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use treasure_shared::{
    read_result, read_string, write_tile, PickResult, PrefixWidth, ProtocolError, Tile,
};

pub struct Client<S> {
    stream: S,
    name: String,
}

impl Client<TcpStream> {
    /// Connects to a server and waits for the assigned player name
    pub async fn connect(server_addr: &str) -> Result<Self, ProtocolError> {
        info!("Connecting to {}...", server_addr);
        let stream = TcpStream::connect(server_addr).await?;
        stream.set_nodelay(true)?;
        Self::handshake(stream).await
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn handshake(mut stream: S) -> Result<Self, ProtocolError> {
        let name = read_string(&mut stream, PrefixWidth::Two).await?;
        info!("Seated as player {}", name);
        Ok(Self { stream, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends one pick and waits for the server's answer
    pub async fn pick(&mut self, tile: Tile) -> Result<PickResult, ProtocolError> {
        write_tile(&mut self.stream, tile).await?;
        let result = read_result(&mut self.stream).await?;
        debug!("Pick ({}, {}) -> {:?}", tile.row, tile.col, result);
        Ok(result)
    }

    /// Prompts for picks until input runs out or the server hangs up
    pub async fn run<R, W>(
        &mut self,
        input: &mut InputReader<R>,
        out: &mut W,
    ) -> Result<(), ProtocolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(tile) = input.next_tile(out).await? {
            match self.pick(tile).await {
                Ok(result) => {
                    let line = format!("{}\n", describe(result, &self.name));
                    out.write_all(line.as_bytes()).await?;
                }
                Err(e) if e.is_disconnect() => {
                    out.write_all(b"Server closed connection.\n").await?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        out.flush().await?;
        Ok(())
    }
}

/// Human-readable line for a pick result, from the point of view of `name`
pub fn describe(result: PickResult, name: &str) -> String {
    match result {
        PickResult::OutOfBounds => "That tile is outside the board.".to_string(),
        PickResult::Scores {
            player_one,
            player_two,
        } => match result.score_for(name) {
            Some(own) => format!(
                "Current Score: {} (One: {}, Two: {})",
                own, player_one, player_two
            ),
            None => format!("Scores - One: {}, Two: {}", player_one, player_two),
        },
    }
}
