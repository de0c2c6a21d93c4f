use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// The mobile piece trying to reach the perimeter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    position: Option<Coord2>,
}

impl Token {
    pub const fn new(id: TokenId) -> Self {
        Self { id, position: None }
    }

    pub const fn id(&self) -> TokenId {
        self.id
    }

    /// Current cell, `None` before the token is placed.
    pub const fn position(&self) -> Option<Coord2> {
        self.position
    }

    pub(crate) fn attach(&mut self, coords: Coord2) {
        self.position = Some(coords);
    }

    pub(crate) fn detach(&mut self) {
        self.position = None;
    }

    /// Directions whose neighbor can take the token right now.
    pub fn open_directions(&self, grid: &Grid) -> SmallVec<[Direction; 6]> {
        let Some(cell) = self.position.and_then(|coords| grid.cell_at(coords)) else {
            return SmallVec::new();
        };
        cell.iter_neighbors()
            .filter(|&(_, next)| grid.can_accept_occupant(next))
            .map(|(direction, _)| direction)
            .collect()
    }

    /// Whether at least one neighbor is free to step into.
    pub fn can_move(&self, grid: &Grid) -> bool {
        !self.open_directions(grid).is_empty()
    }

    /// Steps one cell in `direction`.
    ///
    /// Moving off the board or into a blocked or occupied cell is a no-op.
    /// Errors only when the token is not on the board or the cell and token
    /// cannot be reconciled.
    pub fn step(&mut self, grid: &mut Grid, direction: Direction) -> Result<MoveOutcome> {
        let from = self.position.ok_or(GameError::NoToken)?;
        let Some(to) = grid.neighbor(from, direction) else {
            return Ok(MoveOutcome::NoChange);
        };
        if !grid.can_accept_occupant(to) {
            return Ok(MoveOutcome::NoChange);
        }

        if grid.remove_occupant(from, self).is_none() {
            return Err(GameError::TokenDesync { cell: from });
        }
        if !grid.place_occupant(to, self) {
            return Err(GameError::TokenDesync { cell: to });
        }

        log::trace!("Token moved {:?} -> {:?} ({:?})", from, to, direction);
        Ok(MoveOutcome::Moved { from, to })
    }
}
