//! Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! A generic UCT search over any [`Game`](crate::rules::Game) adapter:
//!
//! - **Pooled tree**: nodes live in an arena addressed by [`NodeId`];
//!   discarded subtrees are recycled instead of freed
//! - **Hashed child index**: existence checks during expansion walk a
//!   2-bit trie keyed by the adapter's move hash
//! - **Tree reuse**: playing a real move keeps the matching subtree
//! - **Root parallelism**: [`ParallelSearch`] runs independent trees and
//!   picks the strongest root move
//!
//! ## Usage
//!
//! ```rust
//! use monte::games::mnk::{MnkConfig, MnkGame};
//! use monte::mcts::{MCTSConfig, MCTSSearch};
//! use monte::rules::Game;
//!
//! let game = MnkGame::new(MnkConfig::new(3, 3, 3)).unwrap();
//! let start = game.create_state();
//! let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
//!
//! search.iterate_n(1000).unwrap();
//! let mv = search.pick_move().unwrap();
//! search.apply_move(&mv).unwrap();
//! ```

pub mod config;
pub(crate) mod index;
pub mod node;
pub mod parallel;
pub mod policy;
pub mod pool;
pub mod sampling;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{MCTSConfig, RolloutKind};
pub use index::{Probe, Slot};
pub use node::{MCTSNode, NodeId};
pub use parallel::{ParallelSearch, Verdict};
pub use policy::{select_child, uct_score, DecisiveRollout, RolloutPolicy, UniformRollout};
pub use pool::NodePool;
pub use sampling::Reservoir;
pub use search::{ChildStats, MCTSSearch};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
