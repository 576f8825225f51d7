//! # monte
//!
//! A generic Monte Carlo Tree Search engine for turn-based games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: The engine never interprets game concepts. Games
//!    plug in through the [`Game`] adapter trait.
//!
//! 2. **N-Player First**: Scores are kept per player and every node records
//!    who moves there. Nothing assumes two players.
//!
//! 3. **No Hidden Allocation Failures**: The node pool reserves fallibly and
//!    reports [`MonteError::OutOfMemory`] instead of aborting.
//!
//! ## Architecture
//!
//! - **Pooled Tree**: Nodes are indices into one arena. Tree reuse returns
//!   discarded subtrees to a free list that later expansions draw from.
//!
//! - **Deterministic**: Each search owns a seeded [`GameRng`]. The same seed
//!   and the same iteration count always grow the same tree.
//!
//! - **Root Parallelism**: Independent trees run on rayon's pool and only
//!   meet to compare their best moves.
//!
//! ## Modules
//!
//! - `core`: Players, per-player maps, RNG, errors
//! - `rules`: The `Game` adapter trait and `StateInfo`
//! - `mcts`: Tree, policies, search engine, parallel coordinator
//! - `games`: Bundled adapters (m,n,k)

pub mod core;
pub mod games;
pub mod mcts;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{GameRng, GameRngState, MonteError, PlayerId, PlayerMap, Result};

pub use crate::rules::{Game, StateInfo};

pub use crate::mcts::{
    ChildStats, MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, NodeId, ParallelSearch, RolloutKind,
    RolloutPolicy, SearchStats, TreeStats, Verdict,
};
