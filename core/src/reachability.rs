use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};

use crate::*;

/// Cells the search may step onto. The start cell is exempt because it holds
/// the token doing the search.
fn passable(grid: &Grid, coords: Coord2) -> bool {
    grid.cell_at(coords)
        .is_some_and(|cell| !cell.is_blocked() && !cell.is_occupied())
}

/// Whether any perimeter cell can be reached from `start` over open cells.
pub fn can_reach_perimeter(grid: &Grid, start: Coord2) -> bool {
    if !grid.contains(start) {
        return false;
    }

    let mut visited: HashSet<Coord2> = HashSet::from([start]);
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        if grid.is_perimeter(coords) {
            return true;
        }
        for direction in Direction::ALL {
            let Some(next) = grid.neighbor(coords, direction) else {
                continue;
            };
            if passable(grid, next) && visited.insert(next) {
                to_visit.push_back(next);
            }
        }
    }
    false
}

/// Shortest open path from `start` to the nearest perimeter cell, both ends
/// included.
pub fn shortest_escape_path(grid: &Grid, start: Coord2) -> Option<Vec<Coord2>> {
    if !grid.contains(start) {
        return None;
    }

    let mut came_from: HashMap<Coord2, Coord2> = HashMap::new();
    let mut visited: HashSet<Coord2> = HashSet::from([start]);
    let mut to_visit = VecDeque::from([start]);

    while let Some(coords) = to_visit.pop_front() {
        if grid.is_perimeter(coords) {
            let mut path = Vec::from([coords]);
            let mut current = coords;
            while let Some(&previous) = came_from.get(&current) {
                path.push(previous);
                current = previous;
            }
            path.reverse();
            return Some(path);
        }
        for direction in Direction::ALL {
            let Some(next) = grid.neighbor(coords, direction) else {
                continue;
            };
            if passable(grid, next) && visited.insert(next) {
                came_from.insert(next, coords);
                to_visit.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_token(side: Coord) -> (Grid, Token) {
        let mut grid = Grid::build(side).unwrap();
        let mut token = Token::new(TokenId(0));
        assert!(grid.place_occupant(ORIGIN, &mut token));
        (grid, token)
    }

    #[test]
    fn open_board_reaches_perimeter() {
        let (grid, _) = board_with_token(5);

        assert!(can_reach_perimeter(&grid, ORIGIN));
        assert_eq!(shortest_escape_path(&grid, ORIGIN).unwrap().len(), 5);
    }

    #[test]
    fn start_on_perimeter_reaches_immediately() {
        let grid = Grid::build(3).unwrap();

        assert!(can_reach_perimeter(&grid, (2, 0)));
        assert_eq!(shortest_escape_path(&grid, (2, 0)), Some(Vec::from([(2, 0)])));
    }

    #[test]
    fn sealed_ring_blocks_escape() {
        let (mut grid, _) = board_with_token(4);
        for direction in Direction::ALL {
            grid.set_blocked(ORIGIN.step(direction), Blockage::turns(1));
        }

        assert!(!can_reach_perimeter(&grid, ORIGIN));
        assert_eq!(shortest_escape_path(&grid, ORIGIN), None);
    }

    #[test]
    fn wider_ring_with_one_gap_still_escapes() {
        let (mut grid, _) = board_with_token(4);
        let ring: Vec<Coord2> = grid
            .iter_cells()
            .map(Cell::coords)
            .filter(|coords| coords.ring() == 2)
            .collect();
        for &coords in &ring[1..] {
            grid.set_blocked(coords, Blockage::Permanent);
        }

        assert!(can_reach_perimeter(&grid, ORIGIN));
        let path = shortest_escape_path(&grid, ORIGIN).unwrap();
        assert_eq!(path.first(), Some(&ORIGIN));
        assert!(path.contains(&ring[0]));
        assert!(grid.is_perimeter(*path.last().unwrap()));

        grid.set_blocked(ring[0], Blockage::Permanent);
        assert!(!can_reach_perimeter(&grid, ORIGIN));
    }

    #[test]
    fn destroyed_cells_act_as_walls() {
        let mut grid = Grid::build(2).unwrap();
        for direction in Direction::ALL {
            grid.destroy_cell(ORIGIN.step(direction));
        }

        assert!(!can_reach_perimeter(&grid, ORIGIN));
    }
}
