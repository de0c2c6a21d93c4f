use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Hexagonal board of cells addressed by axial coordinates.
///
/// Cells live in a square arena indexed by `(x + radius, y + radius)`; the
/// two corners outside the hexagon stay empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    side_length: Coord,
    cells: Array2<Option<Cell>>,
    cell_count: CellCount,
    #[serde(skip)]
    changed: Vec<Coord2>,
}

impl Grid {
    /// Builds every cell within `side_length - 1` of the origin and wires
    /// their neighbors.
    pub fn build(side_length: Coord) -> Result<Self> {
        if side_length <= 1 || side_length > MAX_SIDE_LENGTH {
            return Err(GameError::InvalidConfiguration { side_length });
        }

        let radius = side_length - 1;
        let dim = (2 * radius + 1) as usize;
        let mut cells = Array2::from_shape_fn((dim, dim), |(i, j)| {
            let coords = (i as Coord - radius, j as Coord - radius);
            (coords.ring() <= radius).then(|| Cell::new(coords))
        });

        let present = |coords: Coord2| coords.ring() <= radius;
        for cell in cells.iter_mut().flatten() {
            let coords = cell.coords();
            for direction in Direction::ALL {
                let next = coords.step(direction);
                if present(next) {
                    cell.link(direction, next);
                }
            }
        }

        let grid = Self {
            side_length,
            cells,
            cell_count: hex_cell_count(side_length),
            changed: Vec::new(),
        };
        log::debug!(
            "Built board with side {} ({} cells)",
            side_length,
            grid.cell_count
        );
        Ok(grid)
    }

    pub fn side_length(&self) -> Coord {
        self.side_length
    }

    /// Distance from the centre to the perimeter ring.
    pub fn radius(&self) -> Coord {
        self.side_length - 1
    }

    pub fn cell_count(&self) -> CellCount {
        self.cell_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        let slot = self.slot(coords)?;
        self.cells[slot].as_ref()
    }

    pub(crate) fn cell_at_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        let slot = self.slot(coords)?;
        self.cells[slot].as_mut()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Whether `coords` is a board cell on the outermost ring.
    pub fn is_perimeter(&self, coords: Coord2) -> bool {
        self.contains(coords) && coords.ring() == self.radius()
    }

    pub fn neighbor(&self, coords: Coord2, direction: Direction) -> Option<Coord2> {
        self.cell_at(coords)?.neighbor(direction)
    }

    pub fn is_blocked(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some_and(Cell::is_blocked)
    }

    pub fn is_occupied(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some_and(Cell::is_occupied)
    }

    pub fn can_accept_occupant(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_some_and(Cell::can_accept_occupant)
    }

    /// Puts `token` on the cell at `coords`, updating both sides.
    pub fn place_occupant(&mut self, coords: Coord2, token: &mut Token) -> bool {
        if token.position().is_some() {
            return false;
        }
        let Some(cell) = self.cell_at_mut(coords) else {
            return false;
        };
        if !cell.set_occupant(token.id()) {
            return false;
        }
        token.attach(coords);
        self.changed.push(coords);
        true
    }

    /// Lifts `token` off the cell at `coords`, updating both sides.
    pub fn remove_occupant(&mut self, coords: Coord2, token: &mut Token) -> Option<TokenId> {
        if token.position() != Some(coords) {
            return None;
        }
        let cell = self.cell_at_mut(coords)?;
        if cell.occupant() != Some(token.id()) {
            return None;
        }
        let removed = cell.take_occupant();
        token.detach();
        removed
    }

    /// Applies a block request to a single cell. See [`Blockage::overrides`].
    pub fn set_blocked(&mut self, coords: Coord2, request: Blockage) -> bool {
        let Some(cell) = self.cell_at_mut(coords) else {
            return false;
        };
        let before = cell.blockage();
        if !cell.set_blocked(request) {
            return false;
        }
        if before != request {
            self.changed.push(coords);
        }
        true
    }

    /// Counts every temporary block down by one turn, returning how many
    /// cells changed.
    pub fn decay_blocks(&mut self) -> CellCount {
        let mut decayed = 0;
        for cell in self.cells.iter_mut().flatten() {
            if cell.decay_one_turn() {
                self.changed.push(cell.coords());
                decayed += 1;
            }
        }
        if decayed > 0 {
            log::trace!("{} blocks decayed", decayed);
        }
        decayed
    }

    /// Removes a cell from the board and every neighbor's link back to it.
    pub fn destroy_cell(&mut self, coords: Coord2) -> Option<Cell> {
        let slot = self.slot(coords)?;
        if self.cells[slot].as_ref()?.is_occupied() {
            log::warn!("Refusing to destroy occupied cell {:?}", coords);
            return None;
        }

        let mut cell = self.cells[slot].take()?;
        for neighbor in cell.clear_links().into_iter().flatten() {
            if let Some(neighbor_cell) = self.cell_at_mut(neighbor) {
                neighbor_cell.unlink(coords);
            }
        }
        self.cell_count -= 1;
        log::debug!("Destroyed cell {:?}", coords);
        Some(cell)
    }

    /// Drains the cells whose state changed since the last call, in order.
    pub fn take_changes(&mut self) -> Vec<Coord2> {
        core::mem::take(&mut self.changed)
    }

    fn slot(&self, (x, y): Coord2) -> Option<[usize; 2]> {
        let radius = self.radius();
        let span = -radius..=radius;
        if !span.contains(&x) || !span.contains(&y) {
            return None;
        }
        Some([(x + radius) as usize, (y + radius) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_degenerate_sides() {
        assert_eq!(
            Grid::build(1),
            Err(GameError::InvalidConfiguration { side_length: 1 })
        );
        assert!(Grid::build(0).is_err());
        assert!(Grid::build(-3).is_err());
        assert!(Grid::build(MAX_SIDE_LENGTH + 1).is_err());
    }

    #[test]
    fn build_creates_full_hexagon() {
        for side in 2..=9 {
            let grid = Grid::build(side).unwrap();
            let total = grid.iter_cells().count() as CellCount;

            assert_eq!(total, hex_cell_count(side));
            assert_eq!(grid.cell_count(), total);
            for cell in grid.iter_cells() {
                assert!((2..=6).contains(&cell.neighbor_count()));
            }
        }
    }

    #[test]
    fn neighbor_links_are_symmetric() {
        let grid = Grid::build(4).unwrap();

        for cell in grid.iter_cells() {
            for (direction, neighbor) in cell.iter_neighbors() {
                assert_eq!(
                    grid.neighbor(neighbor, direction.opposite()),
                    Some(cell.coords())
                );
            }
        }
    }

    #[test]
    fn perimeter_is_outer_ring() {
        let grid = Grid::build(3).unwrap();

        assert!(!grid.is_perimeter(ORIGIN));
        assert!(!grid.is_perimeter((1, 0)));
        assert!(grid.is_perimeter((2, 0)));
        assert!(grid.is_perimeter((1, -2)));
        assert!(grid.is_perimeter((-2, 2)));
        assert!(!grid.is_perimeter((2, 2)));
        assert_eq!(grid.cell_at((2, 2)), None);
        assert_eq!(grid.cell_at((3, 0)), None);

        let corner = grid.cell_at((2, 0)).unwrap();
        assert_eq!(corner.neighbor_count(), 3);
        assert_eq!(
            grid.iter_cells().filter(|c| grid.is_perimeter(c.coords())).count(),
            12
        );
    }

    #[test]
    fn place_and_remove_keep_both_sides_consistent() {
        let mut grid = Grid::build(3).unwrap();
        let mut token = Token::new(TokenId(0));

        assert!(grid.place_occupant(ORIGIN, &mut token));
        assert_eq!(token.position(), Some(ORIGIN));
        assert_eq!(grid.cell_at(ORIGIN).unwrap().occupant(), Some(TokenId(0)));
        assert!(!grid.place_occupant((1, 0), &mut token));
        assert_eq!(grid.take_changes(), [ORIGIN]);

        assert_eq!(grid.remove_occupant((1, 0), &mut token), None);
        assert_eq!(grid.remove_occupant(ORIGIN, &mut token), Some(TokenId(0)));
        assert_eq!(token.position(), None);
        assert!(!grid.is_occupied(ORIGIN));
    }

    #[test]
    fn set_blocked_reports_changes_only_when_state_moves() {
        let mut grid = Grid::build(3).unwrap();

        assert!(grid.set_blocked((1, 0), Blockage::Permanent));
        assert!(!grid.set_blocked((1, 0), Blockage::turns(1)));
        assert!(!grid.set_blocked((5, 0), Blockage::Permanent));
        assert!(grid.set_blocked((0, 1), Blockage::turns(1)));
        assert_eq!(grid.take_changes(), [(1, 0), (0, 1)]);

        assert_eq!(grid.decay_blocks(), 1);
        assert!(!grid.is_blocked((0, 1)));
        assert!(grid.is_blocked((1, 0)));
        assert_eq!(grid.take_changes(), [(0, 1)]);
    }

    #[test]
    fn destroy_cell_removes_back_references() {
        let mut grid = Grid::build(3).unwrap();
        let removed = grid.destroy_cell((1, 0)).unwrap();

        assert_eq!(removed.neighbor_count(), 0);
        assert!(!grid.contains((1, 0)));
        assert_eq!(grid.cell_count(), 18);
        assert_eq!(grid.neighbor(ORIGIN, Direction::East), None);
        assert_eq!(grid.neighbor((2, 0), Direction::West), None);
        assert!(
            grid.iter_cells()
                .all(|cell| cell.iter_neighbors().all(|(_, n)| n != (1, 0)))
        );
        assert_eq!(grid.destroy_cell((1, 0)), None);
    }

    #[test]
    fn destroy_cell_refuses_occupied_cell() {
        let mut grid = Grid::build(2).unwrap();
        let mut token = Token::new(TokenId(0));
        grid.place_occupant(ORIGIN, &mut token);

        assert_eq!(grid.destroy_cell(ORIGIN), None);
        assert!(grid.contains(ORIGIN));
    }

    #[test]
    fn lookups_at_coordinate_extremes_miss() {
        let grid = Grid::build(3).unwrap();

        for coords in [(Coord::MIN, 0), (0, Coord::MIN), (Coord::MAX, 0), (0, Coord::MAX)] {
            assert!(grid.cell_at(coords).is_none());
            assert!(!grid.contains(coords));
            assert!(!grid.is_perimeter(coords));
        }
    }
}
