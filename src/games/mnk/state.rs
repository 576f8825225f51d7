//! Board state for the m,n,k game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{MonteError, PlayerId, Result};

/// Board dimensions and the run length needed to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnkConfig {
    pub width: u8,
    pub height: u8,
    /// Stones in a row needed to win.
    pub stride: u8,
}

impl MnkConfig {
    pub fn new(width: u8, height: u8, stride: u8) -> Self {
        Self {
            width,
            height,
            stride,
        }
    }

    /// Reject boards nobody could ever win on.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MonteError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.stride == 0 || self.stride > self.width.max(self.height) {
            return Err(MonteError::InvalidConfig(format!(
                "stride {} does not fit a {}x{} board",
                self.stride, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of cells on the board.
    #[must_use]
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for MnkConfig {
    fn default() -> Self {
        Self::new(3, 3, 3)
    }
}

/// A stone placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MnkMove {
    pub x: u8,
    pub y: u8,
}

impl MnkMove {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for MnkMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Full game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnkState {
    pub config: MnkConfig,
    /// Player to move, `None` once the game is over.
    pub player: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    /// Empty cells left.
    pub num_spaces: u16,
    /// Row-major cells: 0 is empty, otherwise owner index + 1.
    board: Vec<u8>,
}

impl MnkState {
    /// Empty board with player 0 to move.
    pub fn new(config: MnkConfig) -> Self {
        Self {
            config,
            player: Some(PlayerId::new(0)),
            winner: None,
            num_spaces: config.cells() as u16,
            board: vec![0; config.cells()],
        }
    }

    /// Load a position from text rows.
    ///
    /// `_` is empty, `x` and `o` are stones of players 0 and 1. `+` and `0`
    /// are stones of players 0 and 1 that were played last, which hands the
    /// move to the other player. Without a last-move marker player 0 moves.
    /// Lines already on the board are not scored.
    pub fn from_rows(config: MnkConfig, rows: &[&str]) -> Result<Self> {
        config.validate()?;
        if rows.len() != config.height as usize {
            return Err(MonteError::InvalidConfig(format!(
                "expected {} rows, got {}",
                config.height,
                rows.len()
            )));
        }

        let mut state = Self::new(config);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != config.width as usize {
                return Err(MonteError::InvalidConfig(format!(
                    "row {y} should have {} cells: {row:?}",
                    config.width
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let (x, y) = (x as u8, y as u8);
                match c {
                    '_' => {}
                    'x' => state.set(x, y, PlayerId::new(0)),
                    'o' => state.set(x, y, PlayerId::new(1)),
                    '+' => {
                        state.set(x, y, PlayerId::new(0));
                        state.player = Some(PlayerId::new(1));
                    }
                    '0' => {
                        state.set(x, y, PlayerId::new(1));
                        state.player = Some(PlayerId::new(0));
                    }
                    other => {
                        return Err(MonteError::InvalidConfig(format!(
                            "unknown cell {other:?} at ({x}, {y})"
                        )))
                    }
                }
            }
        }
        // loaded positions carry no winner, so a full board is a draw
        if state.num_spaces == 0 {
            state.player = None;
        }
        Ok(state)
    }

    fn offset(&self, x: u8, y: u8) -> Option<usize> {
        (x < self.config.width && y < self.config.height)
            .then(|| y as usize * self.config.width as usize + x as usize)
    }

    /// Owner of the cell, `None` if empty or off the board.
    #[must_use]
    pub fn get(&self, x: u8, y: u8) -> Option<PlayerId> {
        let cell = self.board[self.offset(x, y)?];
        cell.checked_sub(1).map(PlayerId::new)
    }

    /// Same as [`MnkState::get`] for signed coordinates.
    pub(crate) fn get_signed(&self, x: i16, y: i16) -> Option<PlayerId> {
        let x = u8::try_from(x).ok()?;
        let y = u8::try_from(y).ok()?;
        self.get(x, y)
    }

    /// Place a stone without any rule checks. Off-board cells are ignored.
    pub fn set(&mut self, x: u8, y: u8, player: PlayerId) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        if self.board[offset] == 0 {
            self.num_spaces -= 1;
        }
        self.board[offset] = player.0 + 1;
    }

    /// Board as text, marking `last` with `+`/`0` like the loader does.
    #[must_use]
    pub fn render_with_last(&self, last: Option<MnkMove>) -> String {
        let mut out = String::with_capacity(self.config.cells() * 2 + self.config.height as usize);
        for y in 0..self.config.height {
            for x in 0..self.config.width {
                let is_last = last == Some(MnkMove::new(x, y));
                let c = match self.get(x, y).map(|p| p.0) {
                    None => '_',
                    Some(0) if is_last => '+',
                    Some(0) => 'x',
                    Some(_) if is_last => '0',
                    Some(_) => 'o',
                };
                out.push(' ');
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for MnkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_last(None))
    }
}
