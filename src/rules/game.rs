//! Game adapter trait.
//!
//! The search engine never interprets game concepts directly. It consumes
//! the capability set below: create/copy state, apply a move, inspect a
//! state, enumerate legal moves, compare and hash moves.
//!
//! ## Implementation Notes
//!
//! - `apply_move` must be deterministic and must be a no-op on a terminal state
//! - `inspect` must report `current_player: None` for terminal states
//! - `for_each_move` must submit every legal move exactly once, in any order
//! - `hash_move` should spread entropy into the low bits; the child index
//!   consumes the lowest bits first

use std::fmt::Debug;

use crate::core::{PlayerId, PlayerMap};

/// Result of inspecting a state.
///
/// Terminal states have `current_player == None`. On a decisive terminal
/// state the winner scores positive and the others negative; draws and
/// non-terminal states score zero for every player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateInfo {
    /// Player to move, `None` when the game is over.
    pub current_player: Option<PlayerId>,

    /// Terminal score per player.
    pub scores: PlayerMap<i32>,
}

impl StateInfo {
    /// Create an empty info buffer for `player_count` players.
    pub fn new(player_count: usize) -> Self {
        Self {
            current_player: None,
            scores: PlayerMap::with_value(player_count, 0),
        }
    }

    /// Is the inspected state terminal?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.current_player.is_none()
    }

    /// First player holding a strictly positive score, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.scores
            .iter()
            .find(|(_, score)| **score > 0)
            .map(|(player, _)| player)
    }

    /// Mark the state as decided in favour of `winner`.
    pub fn set_winner(&mut self, winner: PlayerId) {
        self.current_player = None;
        self.scores.fill(-1);
        self.scores[winner] = 1;
    }
}

/// Game adapter.
///
/// The adapter value itself carries the game configuration, so
/// `create_state` needs no arguments.
pub trait Game: Send + Sync {
    /// Full game state: board, player to move, terminal status.
    type State: Clone + Send;

    /// A small move value. Equality must be exact: hash matches are not
    /// proof of identity.
    type Move: Clone + PartialEq + Debug + Send;

    /// Number of players, fixed for the lifetime of the adapter.
    fn player_count(&self) -> usize;

    /// Create a fresh default state from the adapter's configuration.
    fn create_state(&self) -> Self::State;

    /// Copy `src` into `dst`, reusing `dst`'s storage where possible.
    fn copy_state(&self, dst: &mut Self::State, src: &Self::State) {
        dst.clone_from(src);
    }

    /// Apply a move in place. No-op if the state has no player to move.
    fn apply_move(&self, state: &mut Self::State, mv: &Self::Move);

    /// Report the player to move and terminal scores into `info`.
    fn inspect(&self, state: &Self::State, info: &mut StateInfo);

    /// Submit every legal move from `state` exactly once.
    fn for_each_move(&self, state: &Self::State, submit: &mut dyn FnMut(&Self::Move));

    /// Hash a move into 64 bits.
    fn hash_move(&self, mv: &Self::Move) -> u64;
}
