//! Single-pass reservoir sampling.
//!
//! Legal moves arrive through an adapter callback with no length known in
//! advance. The i-th candidate replaces the held one with probability
//! `1/i`, which leaves every candidate equally likely after one pass with
//! O(1) extra memory.

use crate::core::GameRng;

/// Reservoir of size one.
#[derive(Clone, Debug)]
pub struct Reservoir<T> {
    seen: u32,
    held: Option<T>,
}

impl<T> Default for Reservoir<T> {
    fn default() -> Self {
        Self { seen: 0, held: None }
    }
}

impl<T> Reservoir<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the next candidate. `make` is only called when the candidate
    /// is kept, so callers can defer clones. Returns whether it was kept.
    ///
    /// The first candidate is always kept without drawing from `rng`.
    #[inline]
    pub fn offer_with(&mut self, rng: &mut GameRng, make: impl FnOnce() -> T) -> bool {
        self.seen += 1;
        let keep = self.seen == 1 || rng.next_f32() * (self.seen as f32) < 1.0;
        if keep {
            self.held = Some(make());
        }
        keep
    }

    /// Offer a candidate by value.
    #[inline]
    pub fn offer(&mut self, rng: &mut GameRng, candidate: T) -> bool {
        self.offer_with(rng, || candidate)
    }

    /// Candidates seen so far.
    #[must_use]
    pub fn seen(&self) -> u32 {
        self.seen
    }

    /// The held candidate, `None` if nothing was offered.
    pub fn into_inner(self) -> Option<T> {
        self.held
    }
}
