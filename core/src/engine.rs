use alloc::boxed::Box;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    /// The token can no longer reach the perimeter.
    Win,
    /// The token stands on the perimeter.
    Loss,
    Aborted,
}

impl GameStatus {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        !self.is_in_progress()
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Handle of the token every game places at the origin.
pub const TOKEN: TokenId = TokenId(0);

/// Turn sequencing, obstruction quotas and status for one game.
///
/// A turn is resolved by [`Game::request_obstruction`]. The status re-check
/// after the token moves is deferred until [`Game::settle`], so a front-end
/// can let the move animation finish first. [`Game::play_turn`] runs both.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    token: Token,
    quotas: QuotaTable,
    selected: ObstructionKind,
    status: GameStatus,
    settle_pending: bool,
    turns: CellCount,
    rng: SmallRng,
    events: EventBus,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        let grid = Grid::build(config.side_length)?;
        Self::with_grid(config, grid)
    }

    /// Starts a game on a prepared board, e.g. one with pre-placed blocks or
    /// destroyed cells. The board's side length overrides the config.
    pub fn with_grid(mut config: GameConfig, mut grid: Grid) -> Result<Self> {
        config.side_length = grid.side_length();

        let mut token = Token::new(TOKEN);
        if !grid.place_occupant(ORIGIN, &mut token) {
            return Err(GameError::NoToken);
        }
        grid.take_changes();

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let quotas = QuotaTable::generate(config.quota_policy, config.side_length, &mut rng);

        log::debug!(
            "New game: side {}, seed {:#x}, {:?}",
            config.side_length,
            config.seed,
            config.quota_policy
        );
        Ok(Self {
            config,
            grid,
            token,
            quotas,
            selected: ObstructionKind::FALLBACK,
            status: GameStatus::InProgress,
            settle_pending: false,
            turns: 0,
            rng,
            events: EventBus::default(),
        })
    }

    /// Discards the current game and starts over, keeping subscribers.
    ///
    /// Every cell of the new board is reported as changed, followed by the
    /// selection and status when those differ from the previous game.
    pub fn new_game(&mut self, config: GameConfig) -> Result<()> {
        let fresh = Self::new(config)?;
        let old_status = self.status;
        let old_selected = self.selected;
        let events = core::mem::take(&mut self.events);
        *self = Self { events, ..fresh };

        for cell in self.grid.iter_cells() {
            self.events.emit(GameEvent::CellStateChanged {
                cell: cell.coords(),
            });
        }
        if old_selected != self.selected {
            self.events.emit(GameEvent::SelectionChanged {
                old: old_selected,
                new: self.selected,
            });
        }
        if old_status != self.status {
            self.events.emit(GameEvent::StatusChanged {
                status: self.status,
            });
        }
        Ok(())
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.events.subscribe(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn token_position(&self) -> Option<Coord2> {
        self.token.position()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Successful obstructions so far.
    pub fn turns(&self) -> CellCount {
        self.turns
    }

    pub fn selected_obstruction(&self) -> ObstructionKind {
        self.selected
    }

    pub fn quota(&self, kind: ObstructionKind) -> Quota {
        self.quotas.get(kind)
    }

    pub fn quotas(&self) -> &QuotaTable {
        &self.quotas
    }

    pub fn is_settle_pending(&self) -> bool {
        self.settle_pending
    }

    /// Whether the token has no free neighbor to step into.
    pub fn is_token_sealed(&self) -> bool {
        !self.token.can_move(&self.grid)
    }

    /// Selects `kind` for the next obstruction if it has uses left.
    pub fn select_obstruction(&mut self, kind: ObstructionKind) -> bool {
        if !self.quotas.is_available(kind) {
            log::debug!("{:?} has no uses left", kind);
            return false;
        }
        self.change_selection(kind);
        true
    }

    /// Selects a random kind with uses left, preferring anything over the
    /// fallback.
    pub fn select_random_obstruction(&mut self) -> ObstructionKind {
        let eligible: SmallVec<[ObstructionKind; ObstructionKind::COUNT]> = self
            .quotas
            .iter()
            .filter(|&(kind, quota)| !kind.is_fallback() && quota.is_available())
            .map(|(kind, _)| kind)
            .collect();

        let kind = if eligible.is_empty() {
            ObstructionKind::FALLBACK
        } else {
            eligible[self.rng.random_range(0..eligible.len())]
        };
        self.change_selection(kind);
        kind
    }

    /// Obstructs `coords` with the selected kind and, if that worked, lets
    /// the token take its step.
    ///
    /// Illegal requests are reported through [`TurnOutcome::Rejected`] and
    /// leave the game untouched. Errors mean the engine state is broken.
    pub fn request_obstruction(&mut self, coords: Coord2) -> Result<TurnOutcome> {
        use TurnOutcome::*;

        self.settle()?;
        if !self.status.is_in_progress() {
            return Ok(Rejected(Rejection::NotInProgress));
        }
        if !self.grid.contains(coords) {
            log::warn!("Obstruction requested outside the board at {:?}", coords);
            return Ok(Rejected(Rejection::OutsideBoard));
        }

        let kind = self.selected;
        let applied = kind.apply(&mut self.grid, coords, &mut self.rng);
        self.flush_cell_changes();
        if !applied {
            log::debug!("{:?} refused at {:?}", kind, coords);
            return Ok(Rejected(Rejection::Refused));
        }

        self.turns += 1;
        log::debug!("Turn {}: {:?} at {:?}", self.turns, kind, coords);
        self.events
            .emit(GameEvent::ObstructionApplied { cell: coords, kind });

        if self.quotas.consume(kind) {
            log::debug!("{:?} exhausted", kind);
            self.change_selection(ObstructionKind::FALLBACK);
        }

        let status = self.evaluate_status()?;
        self.set_status(status);
        if status.is_finished() {
            return Ok(Finished(status));
        }

        let (from, to) = self.move_token_randomly()?;
        self.events.emit(GameEvent::TokenMoved { from, to });
        self.flush_cell_changes();

        self.grid.decay_blocks();
        self.flush_cell_changes();

        self.settle_pending = true;
        Ok(Advanced { from, to })
    }

    /// Runs the deferred status re-check of the last turn, if any.
    pub fn settle(&mut self) -> Result<GameStatus> {
        if core::mem::take(&mut self.settle_pending) && self.status.is_in_progress() {
            let status = self.evaluate_status()?;
            self.set_status(status);
        }
        Ok(self.status)
    }

    /// Requests an obstruction and settles the turn right away.
    pub fn play_turn(&mut self, coords: Coord2) -> Result<TurnOutcome> {
        let outcome = self.request_obstruction(coords)?;
        self.settle()?;
        Ok(outcome)
    }

    /// Gives up the current game. Only a game in progress can be abandoned.
    ///
    /// A pending status check runs first, so a turn that already decided the
    /// game is not overwritten.
    pub fn abandon(&mut self) -> Result<bool> {
        self.settle()?;
        if !self.status.is_in_progress() {
            return Ok(false);
        }
        self.set_status(GameStatus::Aborted);
        Ok(true)
    }

    fn evaluate_status(&self) -> Result<GameStatus> {
        let cell = self.token.position().ok_or(GameError::NoToken)?;
        Ok(if self.grid.is_perimeter(cell) {
            GameStatus::Loss
        } else if !can_reach_perimeter(&self.grid, cell) {
            GameStatus::Win
        } else {
            GameStatus::InProgress
        })
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status == status {
            return;
        }
        log::debug!("Status {:?} -> {:?}", self.status, status);
        self.status = status;
        self.events.emit(GameEvent::StatusChanged { status });
    }

    fn change_selection(&mut self, kind: ObstructionKind) {
        let old = core::mem::replace(&mut self.selected, kind);
        self.events
            .emit(GameEvent::SelectionChanged { old, new: kind });
    }

    fn move_token_randomly(&mut self) -> Result<(Coord2, Coord2)> {
        let cell = self.token.position().ok_or(GameError::NoToken)?;
        let open = self.token.open_directions(&self.grid);
        if open.is_empty() {
            return Err(GameError::TokenStuck { cell });
        }

        let direction = open[self.rng.random_range(0..open.len())];
        match self.token.step(&mut self.grid, direction)? {
            MoveOutcome::Moved { from, to } => Ok((from, to)),
            MoveOutcome::NoChange => Err(GameError::TokenStuck { cell }),
        }
    }

    fn flush_cell_changes(&mut self) {
        for cell in self.grid.take_changes() {
            self.events.emit(GameEvent::CellStateChanged { cell });
        }
    }
}
