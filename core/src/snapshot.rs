use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub coords: Coord2,
    pub blockage: Blockage,
    pub occupied: bool,
    pub perimeter: bool,
}

/// Read-only view of a game for front-ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub side_length: Coord,
    pub status: GameStatus,
    pub selected: ObstructionKind,
    pub turns: CellCount,
    pub token: Option<Coord2>,
    pub quotas: Vec<(ObstructionKind, Quota)>,
    pub cells: Vec<CellSnapshot>,
}

impl BoardSnapshot {
    pub fn from_game(game: &Game) -> Self {
        let grid = game.grid();
        let cells = grid
            .iter_cells()
            .map(|cell| CellSnapshot {
                coords: cell.coords(),
                blockage: cell.blockage(),
                occupied: cell.is_occupied(),
                perimeter: grid.is_perimeter(cell.coords()),
            })
            .collect();

        Self {
            side_length: grid.side_length(),
            status: game.status(),
            selected: game.selected_obstruction(),
            turns: game.turns(),
            token: game.token_position(),
            quotas: game.quotas().iter().collect(),
            cells,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<&CellSnapshot> {
        self.cells.iter().find(|cell| cell.coords == coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_game_maps_token_and_blocks() {
        let config = GameConfig::new(3)
            .unwrap()
            .with_quota_policy(QuotaPolicy::Fixed(2));
        let mut game = Game::new(config).unwrap();
        game.play_turn((2, 0)).unwrap();

        let snapshot = BoardSnapshot::from_game(&game);

        assert_eq!(snapshot.cells.len(), 19);
        assert_eq!(snapshot.turns, 1);
        assert_eq!(snapshot.cell((2, 0)).unwrap().blockage, Blockage::Permanent);
        assert!(snapshot.cell((2, 0)).unwrap().perimeter);
        let token = snapshot.token.unwrap();
        assert!(snapshot.cell(token).unwrap().occupied);
        assert_eq!(
            snapshot.cells.iter().filter(|cell| cell.occupied).count(),
            1
        );
        assert_eq!(
            snapshot.quotas[0],
            (ObstructionKind::PermanentCell, Quota::Unlimited)
        );
    }
}
