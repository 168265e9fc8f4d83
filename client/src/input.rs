//! Terminal input: prompting for and validating tile coordinates

use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use treasure_shared::{Tile, MAX_AXIS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Input cannot be empty. Please enter valid integers between 0 and 15.")]
    Empty,
    #[error("Invalid input. Please enter integers between 0 and 15.")]
    NotANumber(String),
    #[error("Invalid input. Please enter integers between 0 and 15.")]
    OutOfRange(i64),
}

/// Parses one coordinate typed by the user
pub fn parse_axis(text: &str) -> Result<u8, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }

    let value: i64 = text
        .parse()
        .map_err(|_| InputError::NotANumber(text.to_string()))?;
    if !(0..i64::from(MAX_AXIS)).contains(&value) {
        return Err(InputError::OutOfRange(value));
    }
    Ok(value as u8)
}

pub fn parse_tile(row: &str, col: &str) -> Result<Tile, InputError> {
    // Both fields are checked for emptiness before either is parsed
    if row.trim().is_empty() || col.trim().is_empty() {
        return Err(InputError::Empty);
    }
    Ok(Tile::new(parse_axis(row)?, parse_axis(col)?))
}

/// Reads row/column pairs line by line, re-prompting until a pair is valid
pub struct InputReader<R> {
    lines: Lines<R>,
}

impl<R> InputReader<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Prompts on `out` for the next tile; `None` once input is exhausted
    pub async fn next_tile<W>(&mut self, out: &mut W) -> io::Result<Option<Tile>>
    where
        W: AsyncWrite + Unpin,
    {
        loop {
            let Some(row) = self.prompt(out, "Enter Row (0-15): ").await? else {
                return Ok(None);
            };
            let Some(col) = self.prompt(out, "Enter Column (0-15): ").await? else {
                return Ok(None);
            };

            match parse_tile(&row, &col) {
                Ok(tile) => return Ok(Some(tile)),
                Err(e) => {
                    out.write_all(format!("{}\n", e).as_bytes()).await?;
                }
            }
        }
    }

    async fn prompt<W>(&mut self, out: &mut W, text: &str) -> io::Result<Option<String>>
    where
        W: AsyncWrite + Unpin,
    {
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        self.lines.next_line().await
    }
}
