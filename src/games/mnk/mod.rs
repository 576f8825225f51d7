//! m,n,k game: two players take turns placing stones on a `width x height`
//! board, and the first to line up `stride` stones in a row, column or
//! diagonal wins. A full board with no line is a draw.
//!
//! Tic-tac-toe is `3,3,3`; gomoku-style play is `9,9,5` or larger.

mod game;
mod state;

pub use game::MnkGame;
pub use state::{MnkConfig, MnkMove, MnkState};
