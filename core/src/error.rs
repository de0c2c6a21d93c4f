use thiserror::Error;

use crate::{Coord, Coord2, MAX_SIDE_LENGTH};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board side length {side_length}, expected 2..={max}", max = MAX_SIDE_LENGTH)]
    InvalidConfiguration { side_length: Coord },
    #[error("No token was placed on the board")]
    NoToken,
    #[error("Token and cell {cell:?} disagree about occupancy")]
    TokenDesync { cell: Coord2 },
    #[error("Token at {cell:?} has no legal move while the game is in progress")]
    TokenStuck { cell: Coord2 },
}

pub type Result<T> = core::result::Result<T, GameError>;
