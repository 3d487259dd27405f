use crate::board::{Board, BoardError};
use crate::game::{GameError, GameRound};
use crate::piece::Owner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a game is set up. Every field has a default, so `{}` is a valid
/// settings document describing a classic 8x8 game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub width: usize,
    pub height: usize,
    pub starting_player: Owner,
    pub turn_order: [Owner; 2],
    /// Empty rows between the two armies; the classic gap when absent.
    pub center_gap: Option<usize>,
    /// Custom starting layout in board codes. Overrides the dimensions.
    pub layout: Option<Vec<Vec<u8>>>,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            width: 8,
            height: 8,
            starting_player: Owner::Player1,
            turn_order: [Owner::Player1, Owner::Player2],
            center_gap: None,
            layout: None,
        }
    }
}

impl GameSettings {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn build_board(&self) -> Result<Board, BoardError> {
        match &self.layout {
            Some(grid) => Board::from_codes(grid),
            None => {
                let gap = self
                    .center_gap
                    .unwrap_or_else(|| Board::classic_gap(self.height));
                Board::with_center_gap(self.width, self.height, gap)
            }
        }
    }
}

impl GameRound {
    pub fn from_settings(settings: &GameSettings) -> Result<Self, GameError> {
        let board = settings.build_board()?;
        GameRound::with_turn_order(board, settings.turn_order, settings.starting_player)
    }
}
