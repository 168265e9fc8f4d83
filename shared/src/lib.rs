//! Wire protocol shared by the treasure-hunt server and client.
//!
//! Every message is fixed-width and big-endian:
//! - a tile pick is one byte, row in the high nibble and column in the low nibble
//! - a pick result is two bytes, either [`OUT_OF_BOUNDS`] or two packed 7-bit scores
//! - strings are sent with a one- or two-byte length prefix
//!
//! Reads loop until the requested byte count arrives or the peer closes the stream.
//! A short read always means the peer went away and is reported as
//! [`ProtocolError::Disconnected`], never decoded.

use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const DEFAULT_PORT: u16 = 12345;

/// Number of addressable values per axis in a pick byte.
pub const MAX_AXIS: u8 = 16;

/// Result code sent instead of scores when the picked tile is off the board.
pub const OUT_OF_BOUNDS: u16 = 0b1100_0000_0000_0000;

/// Scores travel as 7-bit fields.
pub const SCORE_MASK: u16 = 0b111_1111;

/// Names handed out to connections, in seating order.
pub const PLAYER_NAMES: [&str; 2] = ["One", "Two"];

pub const PICK_REQUEST_LEN: usize = 1;
pub const PICK_RESULT_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("peer disconnected after {received} of {expected} bytes")]
    Disconnected { expected: usize, received: usize },
    #[error("string of {len} bytes does not fit a {width:?} length prefix")]
    StringTooLong { len: usize, width: PrefixWidth },
    #[error("coordinate ({row}, {col}) cannot be packed into a single byte")]
    CoordinateOutOfRange { row: u8, col: u8 },
    #[error("received string is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// True when the error only means the other side hung up.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::Disconnected { .. } => true,
            ProtocolError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

/// Width of the length prefix in front of a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixWidth {
    One,
    Two,
}

impl PrefixWidth {
    pub fn len(self) -> usize {
        match self {
            PrefixWidth::One => 1,
            PrefixWidth::Two => 2,
        }
    }

    pub fn max_value(self) -> usize {
        match self {
            PrefixWidth::One => u8::MAX as usize,
            PrefixWidth::Two => u16::MAX as usize,
        }
    }
}

/// A tile coordinate as carried by a pick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub row: u8,
    pub col: u8,
}

impl Tile {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn encode(self) -> Result<u8, ProtocolError> {
        if self.row >= MAX_AXIS || self.col >= MAX_AXIS {
            return Err(ProtocolError::CoordinateOutOfRange {
                row: self.row,
                col: self.col,
            });
        }
        Ok((self.row << 4) | self.col)
    }

    pub fn decode(byte: u8) -> Self {
        Self {
            row: (byte & 0b1111_0000) >> 4,
            col: byte & 0b1111,
        }
    }
}

/// Server answer to a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    OutOfBounds,
    /// Scores of roster slots "One" and "Two". Only the low 7 bits survive encoding.
    Scores { player_one: u32, player_two: u32 },
}

impl PickResult {
    pub fn encode(self) -> u16 {
        match self {
            PickResult::OutOfBounds => OUT_OF_BOUNDS,
            PickResult::Scores {
                player_one,
                player_two,
            } => {
                let one = (player_one as u16) & SCORE_MASK;
                let two = (player_two as u16) & SCORE_MASK;
                (one << 7) | two
            }
        }
    }

    pub fn decode(raw: u16) -> Self {
        // Packed scores occupy 14 bits, so they can never collide with the sentinel
        if raw == OUT_OF_BOUNDS {
            return PickResult::OutOfBounds;
        }
        PickResult::Scores {
            player_one: u32::from((raw >> 7) & SCORE_MASK),
            player_two: u32::from(raw & SCORE_MASK),
        }
    }

    /// Score of the named roster slot, if this result carries scores.
    pub fn score_for(self, name: &str) -> Option<u32> {
        match self {
            PickResult::OutOfBounds => None,
            PickResult::Scores {
                player_one,
                player_two,
            } => match PLAYER_NAMES.iter().position(|n| *n == name) {
                Some(0) => Some(player_one),
                Some(1) => Some(player_two),
                _ => None,
            },
        }
    }
}

/// Reads up to `size` bytes, stopping early only when the peer closes the stream.
///
/// The returned buffer is shorter than `size` exactly when the connection ended.
pub async fn receive<R>(reader: &mut R, size: usize) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut data = vec![0u8; size];
    let mut filled = 0;
    while filled < size {
        let n = reader.read(&mut data[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    data.truncate(filled);
    Ok(data)
}

async fn receive_exact<R>(reader: &mut R, size: usize) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let data = receive(reader, size).await?;
    if data.len() < size {
        return Err(ProtocolError::Disconnected {
            expected: size,
            received: data.len(),
        });
    }
    Ok(data)
}

pub async fn read_tile<R>(reader: &mut R) -> Result<Tile, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let data = receive_exact(reader, PICK_REQUEST_LEN).await?;
    Ok(Tile::decode(data[0]))
}

pub async fn write_tile<W>(writer: &mut W, tile: Tile) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let byte = tile.encode()?;
    writer.write_all(&[byte]).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_result<R>(reader: &mut R) -> Result<PickResult, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let data = receive_exact(reader, PICK_RESULT_LEN).await?;
    Ok(PickResult::decode(u16::from_be_bytes([data[0], data[1]])))
}

pub async fn write_result<W>(writer: &mut W, result: PickResult) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&result.encode().to_be_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn write_string<W>(
    writer: &mut W,
    width: PrefixWidth,
    text: &str,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = text.as_bytes();
    if bytes.len() > width.max_value() {
        return Err(ProtocolError::StringTooLong {
            len: bytes.len(),
            width,
        });
    }

    let mut frame = Vec::with_capacity(width.len() + bytes.len());
    match width {
        PrefixWidth::One => frame.push(bytes.len() as u8),
        PrefixWidth::Two => frame.extend_from_slice(&(bytes.len() as u16).to_be_bytes()),
    }
    frame.extend_from_slice(bytes);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_string<R>(reader: &mut R, width: PrefixWidth) -> Result<String, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let prefix = receive_exact(reader, width.len()).await?;
    let len = match width {
        PrefixWidth::One => prefix[0] as usize,
        PrefixWidth::Two => u16::from_be_bytes([prefix[0], prefix[1]]) as usize,
    };
    let body = receive_exact(reader, len).await?;
    Ok(String::from_utf8(body)?)
}
