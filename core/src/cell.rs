use serde::{Deserialize, Serialize};

use crate::*;

/// How long a cell stays impassable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBlockage")]
pub enum Blockage {
    Open,
    /// Turns remaining until the cell opens again, never zero.
    Turns(u16),
    Permanent,
}

impl Blockage {
    /// Temporary block for `turns` turns, `0` meaning no block at all.
    pub const fn turns(turns: u16) -> Self {
        if turns == 0 {
            Self::Open
        } else {
            Self::Turns(turns)
        }
    }

    pub const fn is_blocked(self) -> bool {
        !matches!(self, Self::Open)
    }

    /// Remaining countdown, `0` when open and `-1` when permanent.
    pub const fn countdown(self) -> i32 {
        match self {
            Self::Open => 0,
            Self::Turns(turns) => turns as i32,
            Self::Permanent => -1,
        }
    }

    /// Whether a request for `self` may replace the `current` block.
    ///
    /// A stronger block is never weakened: permanent blocks are final and a
    /// temporary block only gives way to a permanent one or a strictly
    /// shorter countdown.
    pub const fn overrides(self, current: Blockage) -> bool {
        use Blockage::*;
        match (self, current) {
            (Open, _) => true,
            (_, Permanent) => false,
            (Permanent, _) => true,
            (Turns(_), Open) => true,
            (Turns(requested), Turns(remaining)) => requested < remaining,
        }
    }

    /// Countdown after one more turn has passed.
    pub const fn decayed(self) -> Self {
        match self {
            Self::Turns(turns) => Self::turns(turns.saturating_sub(1)),
            other => other,
        }
    }
}

impl Default for Blockage {
    fn default() -> Self {
        Self::Open
    }
}

/// Wire form of [`Blockage`], normalised on the way in.
#[derive(Deserialize)]
#[serde(rename = "Blockage")]
enum RawBlockage {
    Open,
    Turns(u16),
    Permanent,
}

impl From<RawBlockage> for Blockage {
    fn from(raw: RawBlockage) -> Self {
        match raw {
            RawBlockage::Open => Self::Open,
            RawBlockage::Turns(turns) => Self::turns(turns),
            RawBlockage::Permanent => Self::Permanent,
        }
    }
}

/// Handle of a token living on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u8);

/// One slot of the board arena.
///
/// Neighbor links are coordinates into the same arena and are only rewired
/// when a neighboring cell is destroyed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    occupant: Option<TokenId>,
    blockage: Blockage,
    neighbors: [Option<Coord2>; 6],
}

impl Cell {
    pub(crate) fn new(coords: Coord2) -> Self {
        Self {
            coords,
            occupant: None,
            blockage: Blockage::Open,
            neighbors: [None; 6],
        }
    }

    pub fn coords(&self) -> Coord2 {
        self.coords
    }

    pub fn occupant(&self) -> Option<TokenId> {
        self.occupant
    }

    pub fn blockage(&self) -> Blockage {
        self.blockage
    }

    pub fn is_blocked(&self) -> bool {
        self.blockage.is_blocked()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn can_accept_occupant(&self) -> bool {
        !self.is_occupied() && !self.is_blocked()
    }

    pub fn neighbor(&self, direction: Direction) -> Option<Coord2> {
        self.neighbors[direction.index()]
    }

    pub fn iter_neighbors(&self) -> impl Iterator<Item = (Direction, Coord2)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbor(direction).map(|coords| (direction, coords)))
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }

    pub(crate) fn link(&mut self, direction: Direction, coords: Coord2) {
        self.neighbors[direction.index()] = Some(coords);
    }

    pub(crate) fn unlink(&mut self, coords: Coord2) -> bool {
        let mut removed = false;
        for slot in self.neighbors.iter_mut() {
            if *slot == Some(coords) {
                *slot = None;
                removed = true;
            }
        }
        removed
    }

    pub(crate) fn clear_links(&mut self) -> [Option<Coord2>; 6] {
        core::mem::replace(&mut self.neighbors, [None; 6])
    }

    pub(crate) fn set_occupant(&mut self, token: TokenId) -> bool {
        if !self.can_accept_occupant() {
            return false;
        }
        self.occupant = Some(token);
        true
    }

    pub(crate) fn take_occupant(&mut self) -> Option<TokenId> {
        self.occupant.take()
    }

    /// Applies `request` unless the cell is occupied or already blocked at
    /// least as strongly. Returns whether the request was accepted.
    pub(crate) fn set_blocked(&mut self, request: Blockage) -> bool {
        if self.is_occupied() || !request.overrides(self.blockage) {
            return false;
        }
        self.blockage = request;
        true
    }

    /// Returns whether the countdown changed.
    pub(crate) fn decay_one_turn(&mut self) -> bool {
        let next = self.blockage.decayed();
        let changed = next != self.blockage;
        self.blockage = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_countdown_is_rejected_and_shorter_one_wins() {
        let mut cell = Cell::new(ORIGIN);

        assert!(cell.set_blocked(Blockage::turns(3)));
        assert!(!cell.set_blocked(Blockage::turns(3)));
        assert!(!cell.set_blocked(Blockage::turns(5)));
        assert!(cell.set_blocked(Blockage::turns(1)));
        assert_eq!(cell.blockage(), Blockage::Turns(1));
        assert!(cell.set_blocked(Blockage::Permanent));
        assert!(!cell.set_blocked(Blockage::Permanent));
        assert!(!cell.set_blocked(Blockage::turns(1)));
    }

    #[test]
    fn occupied_cell_refuses_any_block() {
        let mut cell = Cell::new(ORIGIN);

        assert!(cell.set_occupant(TokenId(0)));
        assert!(!cell.set_blocked(Blockage::Permanent));
        assert!(!cell.set_blocked(Blockage::Open));
        assert_eq!(cell.blockage(), Blockage::Open);
    }

    #[test]
    fn blocked_cell_refuses_occupant() {
        let mut cell = Cell::new(ORIGIN);

        assert!(cell.set_blocked(Blockage::turns(2)));
        assert!(!cell.set_occupant(TokenId(0)));
        assert_eq!(cell.occupant(), None);
    }

    #[test]
    fn decay_counts_down_to_open_and_leaves_permanent_alone() {
        let mut cell = Cell::new(ORIGIN);
        cell.set_blocked(Blockage::turns(2));

        assert!(cell.decay_one_turn());
        assert_eq!(cell.blockage().countdown(), 1);
        assert!(cell.decay_one_turn());
        assert_eq!(cell.blockage(), Blockage::Open);
        assert!(!cell.decay_one_turn());

        cell.set_blocked(Blockage::Permanent);
        assert!(!cell.decay_one_turn());
        assert_eq!(cell.blockage().countdown(), -1);
    }

    #[test]
    fn unlink_clears_only_matching_neighbor() {
        let mut cell = Cell::new(ORIGIN);
        cell.link(Direction::East, (1, 0));
        cell.link(Direction::West, (-1, 0));

        assert!(cell.unlink((1, 0)));
        assert_eq!(cell.neighbor(Direction::East), None);
        assert_eq!(cell.neighbor(Direction::West), Some((-1, 0)));
        assert_eq!(cell.neighbor_count(), 1);
    }

    #[test]
    fn zero_countdown_reads_back_as_open() {
        let read = |json: &str| serde_json::from_str::<Blockage>(json).unwrap();

        assert_eq!(read(r#"{"Turns":0}"#), Blockage::Open);
        assert_eq!(read(r#"{"Turns":2}"#), Blockage::Turns(2));
        assert_eq!(read(r#""Permanent""#), Blockage::Permanent);
        assert_eq!(
            serde_json::to_string(&Blockage::Turns(3)).unwrap(),
            r#"{"Turns":3}"#
        );
    }
}
