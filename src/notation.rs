//! Human square names such as `A1` or `AB12`.
//!
//! Columns are lettered left to right (`A`..`Z`, `AA`, `AB`, ...), rows are
//! numbered from the bottom edge starting at 1, so on an 8x8 board `A8` is
//! the top-left square `(0, 0)`.

use crate::board::Coordinate;
use thiserror::Error;

const LETTERS: usize = 26;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("Empty square name")]
    Empty,
    #[error("Square name has no column letters")]
    MissingColumn,
    #[error("Square name has no row number")]
    MissingRow,
    #[error("Invalid row in square name: {0}")]
    InvalidRow(String),
    #[error("Square {0} is not on the board")]
    OutOfBoard(String),
}

/// Letters for a zero-based column index.
pub fn column_name(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % LETTERS;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / LETTERS;
    }
    letters.iter().rev().collect()
}

pub fn square_name(coord: Coordinate, height: usize) -> String {
    format!("{}{}", column_name(coord.col), height - coord.row)
}

/// Parse a square name for a board of the given size. Case-insensitive.
pub fn parse_square(text: &str, width: usize, height: usize) -> Result<Coordinate, NotationError> {
    let text = text.trim().to_ascii_uppercase();
    if text.is_empty() {
        return Err(NotationError::Empty);
    }

    let split = text
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(text.len());
    let (letters, digits) = text.split_at(split);
    if letters.is_empty() {
        return Err(NotationError::MissingColumn);
    }
    if digits.is_empty() {
        return Err(NotationError::MissingRow);
    }

    let rank: usize = digits
        .parse()
        .map_err(|_| NotationError::InvalidRow(digits.to_string()))?;

    let col = letters
        .bytes()
        .fold(0usize, |acc, b| {
            acc.saturating_mul(LETTERS)
                .saturating_add((b - b'A') as usize + 1)
        })
        - 1;

    if rank == 0 || rank > height || col >= width {
        return Err(NotationError::OutOfBoard(text));
    }

    Ok(Coordinate::new(height - rank, col))
}
