//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters accumulated over the lifetime of one search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations performed.
    pub iterations: u64,

    /// Nodes added by expansion.
    pub expansions: u64,

    /// Moves played during simulations.
    pub rollout_plies: u64,

    /// Real moves applied to the tree.
    pub moves_applied: u32,

    /// Real moves whose child already existed and kept its statistics.
    pub roots_reused: u32,

    /// Nodes handed back to the pool by tree reuse.
    pub nodes_recycled: u64,

    /// Time spent inside `iterate` calls (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Average simulation length in plies.
    #[must_use]
    pub fn avg_rollout_length(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.rollout_plies as f64 / self.iterations as f64
        }
    }
}
