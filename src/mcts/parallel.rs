//! Root-parallel search.
//!
//! Several independent [`MCTSSearch`] engines, one per worker, each with its
//! own tree and RNG stream. Workers share nothing while iterating; the
//! coordinator only joins them to compare their best root moves and to
//! broadcast the move actually played.

use rayon::prelude::*;
use tracing::debug;

use crate::core::{GameRng, MonteError, Result};
use crate::rules::Game;

use super::config::MCTSConfig;
use super::search::MCTSSearch;

/// Best move reported by the coordinator.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict<M> {
    pub mv: M,
    /// Visit count the winning worker gave `mv`.
    pub score: u32,
    /// Index of the winning worker.
    pub worker: usize,
}

/// Coordinator over `config.workers` independent engines.
pub struct ParallelSearch<G: Game> {
    engines: Vec<MCTSSearch<G>>,
}

impl<G: Game + Clone> ParallelSearch<G> {
    /// Create one engine per worker, all rooted at `initial`.
    ///
    /// Worker 0 uses `config.seed`; every other worker gets a seed forked
    /// from it, so the whole ensemble is reproducible from one seed.
    pub fn new(game: G, initial: &G::State, config: MCTSConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(MonteError::NoWorkers);
        }

        let mut seeds = GameRng::new(config.seed);
        let mut engines = Vec::with_capacity(config.workers);
        for worker in 0..config.workers {
            let seed = if worker == 0 {
                config.seed
            } else {
                seeds.fork().seed()
            };
            let engine_config = config.clone().with_seed(seed);
            engines.push(MCTSSearch::new(game.clone(), initial, engine_config)?);
        }

        debug!(workers = engines.len(), seed = config.seed, "parallel search ready");
        Ok(Self { engines })
    }
}

impl<G: Game> ParallelSearch<G> {
    /// Run `iterations` playouts on every engine concurrently, then report
    /// the best move.
    pub fn search(&mut self, iterations: u32) -> Result<Verdict<G::Move>> {
        self.engines
            .par_iter_mut()
            .try_for_each(|engine| engine.iterate_n(iterations))?;
        self.best_move()
    }

    /// The best move over all engines: each engine proposes its most
    /// visited root move and the highest visit count wins. Ties go to the
    /// lowest worker index. Engines with nothing to propose are skipped.
    pub fn best_move(&self) -> Result<Verdict<G::Move>> {
        let mut best: Option<Verdict<G::Move>> = None;
        for (worker, engine) in self.engines.iter().enumerate() {
            let (mv, score) = match engine.pick_move_with_score() {
                Ok(found) => found,
                Err(MonteError::NoIterations) => continue,
                Err(e) => return Err(e),
            };
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Verdict { mv, score, worker });
            }
        }

        let verdict = best.ok_or(MonteError::NoIterations)?;
        debug!(worker = verdict.worker, score = verdict.score, mv = ?verdict.mv, "best move");
        Ok(verdict)
    }

    /// Play `mv` on every engine.
    pub fn apply_move(&mut self, mv: &G::Move) -> Result<()> {
        self.engines
            .iter_mut()
            .try_for_each(|engine| engine.apply_move(mv))
    }

    /// Number of workers.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.engines.len()
    }

    /// The authoritative state, shared by every engine.
    #[must_use]
    pub fn state(&self) -> &G::State {
        self.engines[0].state()
    }

    pub fn engines(&self) -> &[MCTSSearch<G>] {
        &self.engines
    }

    pub fn engines_mut(&mut self) -> &mut [MCTSSearch<G>] {
        &mut self.engines
    }

    /// Total iterations across all workers.
    #[must_use]
    pub fn total_iterations(&self) -> u64 {
        self.engines.iter().map(|e| e.stats().iterations).sum()
    }
}
