use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Turns a temporary line stays in place.
pub const LINE_BLOCK_TURNS: u16 = 3;

/// Turns a triangle stays in place.
pub const TRIANGLE_BLOCK_TURNS: u16 = 2;

/// Cells of a triangular cluster, anchored at the targeted cell.
pub type Cluster = SmallVec<[Coord2; 16]>;

/// Ways the player can obstruct the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObstructionKind {
    /// Blocks the targeted cell for the rest of the game.
    PermanentCell,
    /// Blocks the targeted cell and one lateral neighbor for a few turns.
    TemporaryLine,
    /// Blocks a triangle of cells sized after the board for a few turns.
    Triangle,
}

impl ObstructionKind {
    pub const COUNT: usize = 3;

    pub const ALL: [ObstructionKind; Self::COUNT] = [
        ObstructionKind::PermanentCell,
        ObstructionKind::TemporaryLine,
        ObstructionKind::Triangle,
    ];

    /// Always available, selected whenever another kind runs out.
    pub const FALLBACK: ObstructionKind = ObstructionKind::PermanentCell;

    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::PermanentCell)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Obstructs the board around `target`.
    ///
    /// Returns whether the targeted cell itself got blocked; a `false` result
    /// means the turn does not count.
    pub fn apply<R: Rng + ?Sized>(self, grid: &mut Grid, target: Coord2, rng: &mut R) -> bool {
        use ObstructionKind::*;
        match self {
            PermanentCell => block_permanent(grid, target),
            TemporaryLine => block_line(grid, target, rng),
            Triangle => block_triangle(grid, target),
        }
    }
}

fn block_permanent(grid: &mut Grid, target: Coord2) -> bool {
    grid.set_blocked(target, Blockage::Permanent)
}

fn block_line<R: Rng + ?Sized>(grid: &mut Grid, target: Coord2, rng: &mut R) -> bool {
    let blockage = Blockage::turns(LINE_BLOCK_TURNS);
    if !grid.set_blocked(target, blockage) {
        return false;
    }

    let (first, second) = if rng.random_bool(0.5) {
        (Direction::West, Direction::East)
    } else {
        (Direction::East, Direction::West)
    };
    let extended = grid
        .neighbor(target, first)
        .is_some_and(|side| grid.set_blocked(side, blockage));
    if !extended {
        if let Some(side) = grid.neighbor(target, second) {
            grid.set_blocked(side, blockage);
        }
    }
    true
}

fn block_triangle(grid: &mut Grid, target: Coord2) -> bool {
    let cluster = triangle_cluster(grid, target);
    if cluster.iter().any(|&coords| grid.is_occupied(coords)) {
        log::debug!("Triangle at {:?} would cover the token", target);
        return false;
    }

    let blockage = Blockage::turns(TRIANGLE_BLOCK_TURNS);
    let mut target_blocked = false;
    for coords in cluster {
        if grid.set_blocked(coords, blockage) && coords == target {
            target_blocked = true;
        }
    }
    target_blocked
}

/// Rows of the largest triangle whose area fits in a sixth of the board.
pub fn triangle_rows(cell_count: CellCount) -> CellCount {
    let budget = (cell_count / 6).max(1);
    let mut rows = 1;
    while (rows + 1) * (rows + 2) / 2 <= budget {
        rows += 1;
    }
    rows
}

/// Cells of the triangle anchored at `target`.
///
/// Row `r` starts `r` steps north-east of the target and runs east for
/// `rows - r` cells, clipped at the board edge.
pub fn triangle_cluster(grid: &Grid, target: Coord2) -> Cluster {
    let mut cluster = Cluster::new();
    if !grid.contains(target) {
        return cluster;
    }

    let rows = triangle_rows(grid.cell_count());
    let mut row_start = Some(target);
    for row in 0..rows {
        let Some(start) = row_start else {
            break;
        };
        let mut current = Some(start);
        for _ in 0..(rows - row) {
            let Some(coords) = current else {
                break;
            };
            cluster.push(coords);
            current = grid.neighbor(coords, Direction::East);
        }
        row_start = grid.neighbor(start, Direction::NorthEast);
    }
    cluster
}
