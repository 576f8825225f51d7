//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::{MonteError, Result};

/// Which default policy plays out simulations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutKind {
    /// Uniformly random legal moves.
    #[default]
    Uniform,
    /// Play a move that wins on the spot when one exists, else uniform.
    Decisive,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCT exploration constant (default: sqrt(2.5) = 1.581).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Random seed. Same seed and iteration count reproduce the same tree.
    pub seed: u64,

    /// Nodes reserved up front. The pool still grows past this.
    pub initial_capacity: usize,

    /// Default policy for simulations.
    pub rollout: RolloutKind,

    /// Independent trees run by the parallel coordinator.
    pub workers: usize,

    /// Iterations per tree for each real move (used by drivers).
    pub iterations_per_move: u32,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 2.5f64.sqrt(),
            seed: 123,
            initial_capacity: 4096,
            rollout: RolloutKind::Uniform,
            workers: 4,
            iterations_per_move: 30_000,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_rollout(mut self, rollout: RolloutKind) -> Self {
        self.rollout = rollout;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_iterations_per_move(mut self, iterations: u32) -> Self {
        self.iterations_per_move = iterations;
        self
    }

    /// Reject values the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MonteError::InvalidConfig(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}
