//! `Game` implementation for m,n,k.

use tracing::warn;

use crate::core::{PlayerId, Result};
use crate::rules::{Game, StateInfo};

use super::state::{MnkConfig, MnkMove, MnkState};

/// Line directions checked through a freshly placed stone.
const DIRECTIONS: [(i16, i16); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Two-player m,n,k adapter.
#[derive(Clone, Debug)]
pub struct MnkGame {
    config: MnkConfig,
}

impl MnkGame {
    pub fn new(config: MnkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MnkConfig {
        &self.config
    }

    /// Stones of `player` in a straight line away from `(x, y)`, not
    /// counting `(x, y)` itself.
    fn run_length(state: &MnkState, player: PlayerId, x: u8, y: u8, dx: i16, dy: i16) -> u16 {
        let (mut cx, mut cy) = (x as i16 + dx, y as i16 + dy);
        let mut run = 0;
        while state.get_signed(cx, cy) == Some(player) {
            run += 1;
            cx += dx;
            cy += dy;
        }
        run
    }

    fn completes_line(&self, state: &MnkState, player: PlayerId, mv: MnkMove) -> bool {
        let needed = u16::from(self.config.stride) - 1;
        DIRECTIONS.iter().any(|&(dx, dy)| {
            Self::run_length(state, player, mv.x, mv.y, dx, dy)
                + Self::run_length(state, player, mv.x, mv.y, -dx, -dy)
                >= needed
        })
    }
}

/// splitmix64 finaliser.
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

impl Game for MnkGame {
    type State = MnkState;
    type Move = MnkMove;

    fn player_count(&self) -> usize {
        2
    }

    fn create_state(&self) -> MnkState {
        MnkState::new(self.config)
    }

    fn apply_move(&self, state: &mut MnkState, mv: &MnkMove) {
        let Some(player) = state.player else {
            return;
        };
        if mv.x >= state.config.width || mv.y >= state.config.height {
            warn!(%mv, "move off the board ignored");
            return;
        }
        if let Some(owner) = state.get(mv.x, mv.y) {
            warn!(%mv, %owner, "move on an occupied cell ignored");
            return;
        }

        state.set(mv.x, mv.y, player);
        if self.completes_line(state, player, *mv) {
            state.player = None;
            state.winner = Some(player);
        } else if state.num_spaces == 0 {
            state.player = None;
        } else {
            state.player = Some(player.next(2));
        }
    }

    fn inspect(&self, state: &MnkState, info: &mut StateInfo) {
        match state.winner {
            Some(winner) => info.set_winner(winner),
            None => {
                info.current_player = state.player;
                info.scores.fill(0);
            }
        }
    }

    fn for_each_move(&self, state: &MnkState, submit: &mut dyn FnMut(&MnkMove)) {
        if state.player.is_none() {
            return;
        }
        for x in 0..state.config.width {
            for y in 0..state.config.height {
                if state.get(x, y).is_none() {
                    submit(&MnkMove::new(x, y));
                }
            }
        }
    }

    fn hash_move(&self, mv: &MnkMove) -> u64 {
        mix64((u64::from(mv.x) << 8) | u64::from(mv.y))
    }
}
