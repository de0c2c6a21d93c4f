#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use grid::*;
pub use obstruction::*;
pub use quota::*;
pub use reachability::*;
pub use snapshot::*;
pub use token::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod events;
mod grid;
mod obstruction;
mod quota;
mod reachability;
mod snapshot;
mod token;
mod types;

/// Largest board side accepted by [`GameConfig::new`].
pub const MAX_SIDE_LENGTH: Coord = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub side_length: Coord,
    pub seed: u64,
    pub quota_policy: QuotaPolicy,
}

impl GameConfig {
    pub const DEFAULT_SEED: u64 = 0x6361_7474_7261_7000;

    pub const fn new_unchecked(side_length: Coord, seed: u64, quota_policy: QuotaPolicy) -> Self {
        Self {
            side_length,
            seed,
            quota_policy,
        }
    }

    pub fn new(side_length: Coord) -> Result<Self> {
        let config = Self::new_unchecked(side_length, Self::DEFAULT_SEED, QuotaPolicy::Randomized);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub const fn with_quota_policy(self, quota_policy: QuotaPolicy) -> Self {
        Self {
            quota_policy,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.side_length <= 1 || self.side_length > MAX_SIDE_LENGTH {
            return Err(GameError::InvalidConfiguration {
                side_length: self.side_length,
            });
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        hex_cell_count(self.side_length)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Moved { from: Coord2, to: Coord2 },
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Moved { .. } => true,
        }
    }
}

/// Why an obstruction request did not start a turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    NotInProgress,
    OutsideBoard,
    /// The selected obstruction could not block the targeted cell.
    Refused,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Rejected(Rejection),
    /// The obstruction ended the game before the token could move.
    Finished(GameStatus),
    Advanced { from: Coord2, to: Coord2 },
}

impl TurnOutcome {
    pub const fn has_update(self) -> bool {
        use TurnOutcome::*;
        match self {
            Rejected(_) => false,
            Finished(_) => true,
            Advanced { .. } => true,
        }
    }
}
