use serde::{Deserialize, Serialize};

/// Single axial coordinate component.
pub type Coord = i16;

/// Count type used for cell totals, distances and turn counters.
pub type CellCount = u32;

/// Axial hex coordinates `(x, y)`. The implicit third axis is `-(x + y)`.
pub type Coord2 = (Coord, Coord);

/// Centre of every board, where the token starts.
pub const ORIGIN: Coord2 = (0, 0);

/// Number of cells on a hexagonal board with `side_length` cells per edge.
pub const fn hex_cell_count(side_length: Coord) -> CellCount {
    if side_length <= 0 {
        return 0;
    }
    let n = side_length as CellCount;
    3 * n * n - 3 * n + 1
}

/// One of the six neighbor directions of a hex cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Axial displacement of a single step in this direction.
    pub const fn delta(self) -> Coord2 {
        use Direction::*;
        match self {
            West => (-1, 0),
            East => (1, 0),
            NorthWest => (0, -1),
            NorthEast => (1, -1),
            SouthWest => (-1, 1),
            SouthEast => (0, 1),
        }
    }

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            West => East,
            East => West,
            NorthWest => SouthEast,
            NorthEast => SouthWest,
            SouthWest => NorthEast,
            SouthEast => NorthWest,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

pub trait AxialExt: Sized {
    /// Coordinates one step away in `direction`.
    fn step(self, direction: Direction) -> Self;

    /// Hex distance from the board centre.
    fn ring(self) -> Coord;
}

impl AxialExt for Coord2 {
    fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        (self.0 + dx, self.1 + dy)
    }

    fn ring(self) -> Coord {
        let (x, y) = self;
        x.abs().max(y.abs()).max((x + y).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution_and_cancels_the_step() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(ORIGIN.step(direction).step(direction.opposite()), ORIGIN);
        }
    }

    #[test]
    fn every_step_from_origin_lands_on_ring_one() {
        for direction in Direction::ALL {
            assert_eq!(ORIGIN.step(direction).ring(), 1);
        }
        assert_eq!((2, -4).ring(), 4);
        assert_eq!((-3, 1).ring(), 3);
    }

    #[test]
    fn cell_count_matches_closed_form() {
        assert_eq!(hex_cell_count(1), 1);
        assert_eq!(hex_cell_count(2), 7);
        assert_eq!(hex_cell_count(5), 61);
        assert_eq!(hex_cell_count(0), 0);
    }
}
