pub mod board;
pub mod game;
pub mod moves;
pub mod notation;
pub mod piece;
pub mod settings;
pub mod web;

pub use board::*;
pub use game::*;
pub use moves::*;
pub use piece::*;
pub use settings::*;
