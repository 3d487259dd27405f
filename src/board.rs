use crate::notation::column_name;
use crate::piece::{EMPTY_LIGHT_CODE, Owner, PieceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// The four diagonal unit steps as `(row, col)` deltas.
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Coordinate { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Coordinate::new(row, col)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board layout is empty")]
    Empty,
    #[error("Invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Center gap {gap} does not fit a board of height {height}")]
    GapTooLarge { gap: usize, height: usize },
    #[error("Row {row} has {found} squares, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Square ({row}, {col}) breaks the dark/light checkerboard pattern")]
    NotCheckerboard { row: usize, col: usize },
    #[error("Square ({row}, {col}) holds unknown code {code}")]
    UnknownCode { row: usize, col: usize, code: u8 },
}

/// Rectangular checkerboard and the pieces standing on it.
///
/// Dark squares are the ones whose `row + col` parity equals `dark_parity`;
/// every other square is permanently `EmptyLight`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    dark_parity: usize,
    squares: Vec<PieceKind>,
}

impl Board {
    /// Classic starting position: men on the dark squares of each half,
    /// separated by [`Board::classic_gap`] empty rows.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        Self::with_center_gap(width, height, Self::classic_gap(height))
    }

    /// Two empty middle rows on even heights, one on odd heights.
    pub fn classic_gap(height: usize) -> usize {
        if height % 2 == 0 { 2 } else { 1 }
    }

    /// Starting position with at least `gap` empty rows in the middle.
    /// Each side gets `(height - gap) / 2` rows of men; Player2 at the top.
    pub fn with_center_gap(width: usize, height: usize, gap: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        if gap > height {
            return Err(BoardError::GapTooLarge { gap, height });
        }
        Ok(Self::classic_layout(width, height, gap))
    }

    fn classic_layout(width: usize, height: usize, gap: usize) -> Self {
        let rows_per_side = (height - gap) / 2;
        let mut squares = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let square = if (row + col) % 2 == 0 {
                    PieceKind::EmptyLight
                } else if row < rows_per_side {
                    PieceKind::Man(Owner::Player2)
                } else if row >= height - rows_per_side {
                    PieceKind::Man(Owner::Player1)
                } else {
                    PieceKind::EmptyDark
                };
                squares.push(square);
            }
        }

        Board {
            width,
            height,
            dark_parity: 1,
            squares,
        }
    }

    /// Decode a custom layout (see [`PieceKind::from_code`]).
    ///
    /// The grid must be rectangular and form a checkerboard: the parity of
    /// the dark squares is taken from square (0, 0), and every square of the
    /// other parity must hold the light code. Piece placement itself is not
    /// checked for reachability.
    pub fn from_codes(grid: &[Vec<u8>]) -> Result<Self, BoardError> {
        let height = grid.len();
        let width = grid.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(BoardError::Empty);
        }

        let dark_parity = if grid[0][0] == EMPTY_LIGHT_CODE { 1 } else { 0 };
        let mut squares = Vec::with_capacity(width * height);

        for (row, values) in grid.iter().enumerate() {
            if values.len() != width {
                return Err(BoardError::NotRectangular {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (col, &code) in values.iter().enumerate() {
                let square = PieceKind::from_code(code)
                    .map_err(|_| BoardError::UnknownCode { row, col, code })?;
                let dark = (row + col) % 2 == dark_parity;
                if dark == (square == PieceKind::EmptyLight) {
                    return Err(BoardError::NotCheckerboard { row, col });
                }
                squares.push(square);
            }
        }

        Ok(Board {
            width,
            height,
            dark_parity,
            squares,
        })
    }

    /// Encode the board back into the layout integers, without any overlay.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.squares
            .chunks(self.width)
            .map(|row| row.iter().map(PieceKind::code).collect())
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    pub fn is_dark(&self, coord: Coordinate) -> bool {
        self.contains(coord) && (coord.row + coord.col) % 2 == self.dark_parity
    }

    pub fn piece_at(&self, coord: Coordinate) -> Option<PieceKind> {
        if self.contains(coord) {
            Some(self.squares[coord.row * self.width + coord.col])
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, coord: Coordinate, piece: PieceKind) {
        if self.contains(coord) {
            self.squares[coord.row * self.width + coord.col] = piece;
        }
    }

    /// All coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Coordinate::new(row, col)))
    }

    /// `coord` shifted by `(dr, dc)` steps, if that lands on the board.
    pub fn offset(&self, coord: Coordinate, dr: isize, dc: isize) -> Option<Coordinate> {
        let row = coord.row.checked_add_signed(dr)?;
        let col = coord.col.checked_add_signed(dc)?;
        let target = Coordinate::new(row, col);
        self.contains(target).then_some(target)
    }

    pub fn directions() -> [(isize, isize); 4] {
        DIRECTIONS
    }

    /// The up-to-four diagonally adjacent squares inside the board.
    pub fn neighbors_diagonal(&self, coord: Coordinate) -> BTreeSet<Coordinate> {
        DIRECTIONS
            .iter()
            .filter_map(|&(dr, dc)| self.offset(coord, dr, dc))
            .collect()
    }

    pub fn is_out_of_bounds_or_own_piece(&self, coord: Coordinate, owner: Owner) -> bool {
        match self.piece_at(coord) {
            None => true,
            Some(piece) => piece.belongs_to(owner),
        }
    }

    /// The candidates that lie strictly ahead of `origin` for `owner`.
    pub fn forward_squares(
        origin: Coordinate,
        candidates: impl IntoIterator<Item = Coordinate>,
        owner: Owner,
    ) -> BTreeSet<Coordinate> {
        candidates
            .into_iter()
            .filter(|c| match owner {
                Owner::Player1 => c.row < origin.row,
                Owner::Player2 => c.row > origin.row,
            })
            .collect()
    }

    /// The row a man of `owner` is crowned on.
    pub fn is_far_row(&self, coord: Coordinate, owner: Owner) -> bool {
        match owner {
            Owner::Player1 => coord.row == 0,
            Owner::Player2 => coord.row + 1 == self.height,
        }
    }

    pub fn pieces_of(&self, owner: Owner) -> BTreeSet<Coordinate> {
        self.coordinates()
            .filter(|&c| self.piece_at(c).is_some_and(|p| p.belongs_to(owner)))
            .collect()
    }

    pub fn any_pieces_left(&self, owner: Owner) -> bool {
        self.squares.iter().any(|p| p.belongs_to(owner))
    }

    pub fn remove_pieces(&mut self, coords: &BTreeSet<Coordinate>) {
        for &coord in coords {
            self.set(coord, PieceKind::EmptyDark);
        }
    }

    /// Text drawing with column letters on top and rows numbered from the
    /// bottom edge.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("     ");
        for col in 0..self.width {
            out.push_str(&format!("{} ", column_name(col)));
        }
        out.push('\n');
        out.push_str(&format!("   {}\n", "--".repeat(self.width + 1)));

        for row in 0..self.height {
            out.push_str(&format!("{:<2}|  ", self.height - row));
            let glyphs: Vec<String> = (0..self.width)
                .map(|col| self.squares[row * self.width + col].glyph().to_string())
                .collect();
            out.push_str(&glyphs.join(" "));
            out.push('\n');
        }

        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::classic_layout(8, 8, Board::classic_gap(8))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
