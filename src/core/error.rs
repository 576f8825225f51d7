//! Engine error type.

use thiserror::Error;

/// Errors surfaced by the search engine and the bundled adapters.
///
/// Applying a move to a terminal state is not an error: adapters treat it as
/// a no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonteError {
    /// The node arena could not grow.
    #[error("Out of memory: failed to reserve {requested} more tree nodes")]
    OutOfMemory { requested: usize },

    /// `pick_move` was called before any iteration expanded the root.
    #[error("No iterations run yet: the root has no children")]
    NoIterations,

    /// A coordinator needs at least one search tree.
    #[error("Parallel search needs at least one worker")]
    NoWorkers,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A structural tree invariant does not hold.
    #[error("Corrupt tree at {node}: {reason}")]
    CorruptTree { node: String, reason: String },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MonteError>;
