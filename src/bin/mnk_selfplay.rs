//! Self-play on a fixed 9x9 five-in-a-row position.
//!
//! Usage: `mnk-selfplay [iterations-per-move] [workers]`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::str::FromStr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use monte::games::mnk::{MnkConfig, MnkGame, MnkState};
use monte::{MCTSConfig, MonteError, ParallelSearch};

const OPENING: [&str; 9] = [
    "_________",
    "_________",
    "x___o_x__",
    "_oo_xo___",
    "__oxox___",
    "__xoxx+__",
    "xoooox___",
    "_x___x___",
    "_____o___",
];

fn parse_arg<T: FromStr>(position: usize, default: T) -> Result<T, MonteError> {
    parse_count(std::env::args().nth(position), default)
}

/// Parse an optional count straight into its target type, so values that
/// do not fit are rejected instead of truncated.
fn parse_count<T: FromStr>(raw: Option<String>, default: T) -> Result<T, MonteError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| MonteError::InvalidConfig(format!("not a valid count: {raw:?}"))),
    }
}

fn main() -> Result<(), MonteError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let defaults = MCTSConfig::default();
    let iterations: u32 = parse_arg(1, defaults.iterations_per_move)?;
    let workers: usize = parse_arg(2, defaults.workers)?;
    let config = defaults
        .with_iterations_per_move(iterations)
        .with_workers(workers);

    let board = MnkConfig::new(9, 9, 5);
    let game = MnkGame::new(board)?;
    let start = MnkState::from_rows(board, &OPENING)?;
    info!(iterations, workers, "starting self-play\n{start}");

    let mut search = ParallelSearch::new(game, &start, config)?;
    let mut ply = 0;
    while search.state().player.is_some() {
        let verdict = search.search(iterations)?;
        search.apply_move(&verdict.mv)?;
        ply += 1;

        let stats = search.engines()[verdict.worker].stats();
        info!(
            ply,
            mv = %verdict.mv,
            visits = verdict.score,
            worker = verdict.worker,
            ips = stats.iterations_per_second() as u64,
            "move\n{}",
            search.state().render_with_last(Some(verdict.mv))
        );
    }

    match search.state().winner {
        Some(winner) => info!(%winner, ply, "game over"),
        None => info!(ply, "game over, draw"),
    }
    Ok(())
}
