//! Core engine types: players, scores, RNG, errors.
//!
//! These are game-agnostic building blocks shared by the search engine and
//! the game adapters.

pub mod error;
pub mod player;
pub mod rng;

pub use error::{MonteError, Result};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
