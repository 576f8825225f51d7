//! Game adapter trait for engine consumers.
//!
//! Games implement `Game` to define:
//! - How states are created, copied and advanced
//! - Which moves are legal
//! - Who is to move and who won
//!
//! The search engine calls into `Game` but never interprets game-specific
//! concepts directly.

pub mod game;

pub use game::{Game, StateInfo};
