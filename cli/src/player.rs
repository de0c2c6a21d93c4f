use cattrap_core::*;
use clap::ValueEnum;
use rand::Rng;

/// Scripted stand-in for a human clicking on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Player {
    /// Random obstruction kind on a random open cell
    Random,
    /// Permanent block on the next step of the token's shortest escape
    Greedy,
}

impl Player {
    pub(crate) fn choose_target<R: Rng + ?Sized>(self, game: &mut Game, rng: &mut R) -> Option<Coord2> {
        match self {
            Self::Random => random_target(game, rng),
            Self::Greedy => greedy_target(game),
        }
    }
}

fn random_target<R: Rng + ?Sized>(game: &mut Game, rng: &mut R) -> Option<Coord2> {
    if rng.random_bool(0.25) {
        game.select_random_obstruction();
    }

    let open: Vec<Coord2> = game
        .grid()
        .iter_cells()
        .filter(|cell| cell.can_accept_occupant())
        .map(Cell::coords)
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

fn greedy_target(game: &Game) -> Option<Coord2> {
    let token = game.token_position()?;
    let path = shortest_escape_path(game.grid(), token)?;
    path.get(1).copied()
}
