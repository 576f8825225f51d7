//! MCTS policies for tree selection and simulation.
//!
//! - Tree policy: UCT with an instant-win shortcut (`select_child`)
//! - Default policy: `RolloutPolicy` implementations (uniform, decisive)

use crate::core::{GameRng, PlayerId};
use crate::rules::{Game, StateInfo};

use super::config::RolloutKind;
use super::node::NodeId;
use super::sampling::Reservoir;
use super::tree::MCTSTree;

// =============================================================================
// Tree Policy
// =============================================================================

/// UCT score of a child.
///
/// Formula: wins/visits + c * sqrt(ln(N) / visits). An unvisited child
/// scores `+inf` so every child is tried once before UCT comparisons kick in.
#[inline]
#[must_use]
pub fn uct_score(wins: i32, visits: u32, parent_ln_visits: f64, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let visits = visits as f64;
    wins as f64 / visits + exploration * (parent_ln_visits / visits).sqrt()
}

/// Pick the child of `node` to descend into.
///
/// A child flagged as an instant win for the player to move at `node` is
/// taken immediately. Otherwise the highest UCT score wins, ties going to
/// the first child in list order. Returns `None` when `node` has no children.
pub fn select_child<M>(tree: &MCTSTree<M>, node: NodeId, exploration: f64) -> Option<NodeId> {
    let parent = tree.get(node);
    let mover = parent.current_player;
    let parent_ln = (parent.num_visits as f64).ln();

    let mut chosen = None;
    let mut chosen_score = f64::NEG_INFINITY;
    for child in tree.children(node) {
        let candidate = tree.get(child);
        if mover.is_some() && candidate.instant_winner == mover {
            return Some(child);
        }

        let score = uct_score(candidate.num_wins, candidate.num_visits, parent_ln, exploration);
        if score > chosen_score {
            chosen_score = score;
            chosen = Some(child);
        }
    }
    chosen
}

// =============================================================================
// Default Policy
// =============================================================================

/// Picks moves during a simulation.
pub trait RolloutPolicy<G: Game>: Send + Sync {
    /// Choose the next move for `mover` from `state`.
    ///
    /// `lookahead` and `probe` are scratch buffers the policy may clobber.
    /// Returns `None` if the adapter submitted no legal move.
    fn choose(
        &self,
        game: &G,
        state: &G::State,
        mover: PlayerId,
        lookahead: &mut G::State,
        probe: &mut StateInfo,
        rng: &mut GameRng,
    ) -> Option<G::Move>;
}

/// Uniformly random legal move.
#[derive(Clone, Debug, Default)]
pub struct UniformRollout;

impl<G: Game> RolloutPolicy<G> for UniformRollout {
    fn choose(
        &self,
        game: &G,
        state: &G::State,
        _mover: PlayerId,
        _lookahead: &mut G::State,
        _probe: &mut StateInfo,
        rng: &mut GameRng,
    ) -> Option<G::Move> {
        let mut reservoir = Reservoir::new();
        game.for_each_move(state, &mut |mv| {
            reservoir.offer_with(rng, || mv.clone());
        });
        reservoir.into_inner()
    }
}

/// Takes an immediately winning move when one exists, else plays uniformly.
///
/// Each candidate is tried on the lookahead state, so a simulation step
/// costs one copy and one apply per legal move.
#[derive(Clone, Debug, Default)]
pub struct DecisiveRollout;

impl<G: Game> RolloutPolicy<G> for DecisiveRollout {
    fn choose(
        &self,
        game: &G,
        state: &G::State,
        mover: PlayerId,
        lookahead: &mut G::State,
        probe: &mut StateInfo,
        rng: &mut GameRng,
    ) -> Option<G::Move> {
        let mut decisive = None;
        let mut reservoir = Reservoir::new();
        game.for_each_move(state, &mut |mv| {
            if decisive.is_some() {
                return;
            }

            game.copy_state(lookahead, state);
            game.apply_move(lookahead, mv);
            game.inspect(lookahead, probe);
            if probe.is_terminal() && probe.scores[mover] > 0 {
                decisive = Some(mv.clone());
                return;
            }

            reservoir.offer_with(rng, || mv.clone());
        });
        decisive.or_else(|| reservoir.into_inner())
    }
}

impl RolloutKind {
    /// Instantiate the policy this kind names.
    pub fn build<G: Game>(self) -> Box<dyn RolloutPolicy<G>> {
        match self {
            RolloutKind::Uniform => Box::new(UniformRollout),
            RolloutKind::Decisive => Box::new(DecisiveRollout),
        }
    }
}
