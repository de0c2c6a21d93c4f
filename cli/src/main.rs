use anyhow::{Context, Result};
use cattrap_core::*;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;

mod player;

use player::Player;

#[derive(Parser, Debug)]
#[command(version, about = "Plays batches of seeded games without a front-end", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Cells per board edge
    #[arg(short, long, default_value_t = 6)]
    side: Coord,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    games: u32,

    /// Seed of the first game, later games count up from it
    #[arg(long, default_value_t = GameConfig::DEFAULT_SEED)]
    seed: u64,

    /// How targets are picked
    #[arg(short, long, value_enum, default_value_t = Player::Greedy)]
    player: Player,

    /// Fixed number of uses for every limited obstruction kind
    #[arg(long)]
    quota: Option<u16>,
}

#[derive(Debug, Default)]
struct Tally {
    wins: u32,
    losses: u32,
    aborted: u32,
    turns: u64,
}

impl Tally {
    fn record(&mut self, game: &Game) {
        match game.status() {
            GameStatus::Win => self.wins += 1,
            GameStatus::Loss => self.losses += 1,
            GameStatus::Aborted => self.aborted += 1,
            GameStatus::InProgress => log::warn!("Recorded a game still in progress"),
        }
        self.turns += u64::from(game.turns());
    }

    fn games(&self) -> u32 {
        self.wins + self.losses + self.aborted
    }
}

fn play_one(config: GameConfig, player: Player) -> Result<Game> {
    let mut game = Game::new(config)?;
    game.subscribe(|event| log::trace!("{:?}", event));
    let mut rng = SmallRng::seed_from_u64(config.seed.rotate_left(17));

    while !game.is_finished() {
        let Some(target) = player.choose_target(&mut game, &mut rng) else {
            log::debug!("No target left, abandoning");
            game.abandon()?;
            break;
        };

        match game.play_turn(target)? {
            TurnOutcome::Rejected(reason) => {
                log::debug!("{:?} rejected at {:?}", reason, target);
                game.select_obstruction(ObstructionKind::FALLBACK);
            }
            TurnOutcome::Finished(status) => log::debug!("Finished with {:?}", status),
            TurnOutcome::Advanced { from, to } => log::trace!("Token {:?} -> {:?}", from, to),
        }
    }
    Ok(game)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let quota_policy = args
        .quota
        .map_or(QuotaPolicy::Randomized, QuotaPolicy::Fixed);
    let base = GameConfig::new(args.side)
        .context("Invalid board")?
        .with_quota_policy(quota_policy);

    let mut tally = Tally::default();
    for index in 0..args.games {
        let seed = args.seed.wrapping_add(u64::from(index));
        let game = play_one(base.with_seed(seed), args.player)
            .with_context(|| format!("Game with seed {seed:#x} failed"))?;
        log::info!(
            "Game {} (seed {:#x}): {:?} after {} turns",
            index,
            seed,
            game.status(),
            game.turns()
        );
        tally.record(&game);
    }

    let games = tally.games().max(1);
    println!(
        "{} games on side {} with {:?} player: {} won, {} lost, {} aborted, {:.1} turns per game",
        tally.games(),
        args.side,
        args.player,
        tally.wins,
        tally.losses,
        tally.aborted,
        tally.turns as f64 / f64::from(games)
    );
    Ok(())
}
