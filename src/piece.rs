use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Integer codes used by custom layouts and the rendered board view.
pub const EMPTY_DARK_CODE: u8 = 0;
pub const EMPTY_LIGHT_CODE: u8 = 9;
/// Added to a man/king code to mark the selected piece in a board view.
pub const SELECTED_OFFSET: u8 = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PieceError {
    #[error("Unknown piece code: {0}")]
    UnknownCode(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Player1,
    Player2,
}

impl Owner {
    pub fn opponent(&self) -> Owner {
        match self {
            Owner::Player1 => Owner::Player2,
            Owner::Player2 => Owner::Player1,
        }
    }

    /// Row delta of a forward step: Player1 heads toward row 0,
    /// Player2 toward the last row.
    pub fn forward(&self) -> isize {
        match self {
            Owner::Player1 => -1,
            Owner::Player2 => 1,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Owner::Player1 => 1,
            Owner::Player2 => 2,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Owner::Player1 => "Player 1",
            Owner::Player2 => "Player 2",
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of a single square.
///
/// `EmptyLight` marks the off-colour squares of the checkerboard; nothing
/// ever moves onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    EmptyDark,
    EmptyLight,
    Man(Owner),
    King(Owner),
}

impl PieceKind {
    /// Decode a square from the integer encoding:
    /// 0 empty dark, 9 empty light, 1/2 men and 3/4 kings of Player1/Player2.
    pub fn from_code(code: u8) -> Result<PieceKind, PieceError> {
        match code {
            EMPTY_DARK_CODE => Ok(PieceKind::EmptyDark),
            EMPTY_LIGHT_CODE => Ok(PieceKind::EmptyLight),
            1 => Ok(PieceKind::Man(Owner::Player1)),
            2 => Ok(PieceKind::Man(Owner::Player2)),
            3 => Ok(PieceKind::King(Owner::Player1)),
            4 => Ok(PieceKind::King(Owner::Player2)),
            other => Err(PieceError::UnknownCode(other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            PieceKind::EmptyDark => EMPTY_DARK_CODE,
            PieceKind::EmptyLight => EMPTY_LIGHT_CODE,
            PieceKind::Man(owner) => owner.code(),
            PieceKind::King(owner) => owner.code() + 2,
        }
    }

    /// Code of this square with the selection overlay applied.
    /// Empty squares carry no overlay.
    pub fn selected_code(&self) -> u8 {
        match self {
            PieceKind::Man(_) | PieceKind::King(_) => self.code() + SELECTED_OFFSET,
            _ => self.code(),
        }
    }

    pub fn owner(&self) -> Option<Owner> {
        match self {
            PieceKind::Man(owner) | PieceKind::King(owner) => Some(*owner),
            _ => None,
        }
    }

    pub fn is_king(&self) -> bool {
        matches!(self, PieceKind::King(_))
    }

    pub fn is_empty_dark(&self) -> bool {
        matches!(self, PieceKind::EmptyDark)
    }

    pub fn belongs_to(&self, owner: Owner) -> bool {
        self.owner() == Some(owner)
    }

    pub fn is_enemy_of(&self, owner: Owner) -> bool {
        self.owner() == Some(owner.opponent())
    }

    /// Crown a man. Kings and empty squares are returned unchanged.
    pub fn promote(&self) -> PieceKind {
        match self {
            PieceKind::Man(owner) => PieceKind::King(*owner),
            other => *other,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            PieceKind::EmptyDark => ' ',
            PieceKind::EmptyLight => '\u{25AE}',
            PieceKind::Man(Owner::Player1) => '\u{25CF}',
            PieceKind::Man(Owner::Player2) => '\u{25CB}',
            PieceKind::King(Owner::Player1) => '\u{25B2}',
            PieceKind::King(Owner::Player2) => '\u{25B3}',
        }
    }
}

/// The man and the king of `owner`.
pub fn owner_pieces(owner: Owner) -> [PieceKind; 2] {
    [PieceKind::Man(owner), PieceKind::King(owner)]
}

/// The man and the king of the other player.
pub fn enemy_pieces(owner: Owner) -> [PieceKind; 2] {
    owner_pieces(owner.opponent())
}
