//! Core MCTS search algorithm.
//!
//! One `MCTSSearch` owns one tree, the authoritative game state and two
//! scratch states. Each iteration copies the authoritative state into the
//! scratch state, then runs select → expand → simulate → backpropagate on
//! the scratch copy, so search never corrupts the real position.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::core::{GameRng, MonteError, Result};
use crate::rules::{Game, StateInfo};

use super::config::MCTSConfig;
use super::index::Probe;
use super::node::{MCTSNode, NodeId};
use super::policy::{select_child, RolloutPolicy};
use super::sampling::Reservoir;
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Statistics of one root child, for drivers and diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildStats<M> {
    pub mv: M,
    pub visits: u32,
    pub wins: i32,
    pub instant_winner: bool,
}

/// Main MCTS search context.
///
/// Generic over the game adapter. Owns the tree, the RNG and all working
/// states, so independent instances can run on different threads.
pub struct MCTSSearch<G: Game> {
    /// The game adapter.
    game: G,

    /// Search configuration.
    config: MCTSConfig,

    /// The search tree. Its root always matches `current`.
    tree: MCTSTree<G::Move>,

    /// Authoritative game state.
    current: G::State,

    /// Working copy for selection, expansion and simulation.
    scratch: G::State,

    /// Look-ahead buffer for the rollout policy.
    lookahead: G::State,

    /// Inspection result for `scratch`.
    info: StateInfo,

    /// Inspection buffer for the rollout policy.
    probe: StateInfo,

    rng: GameRng,

    rollout: Box<dyn RolloutPolicy<G>>,

    stats: SearchStats,
}

impl<G: Game> MCTSSearch<G> {
    /// Create a search whose root is `initial`.
    pub fn new(game: G, initial: &G::State, config: MCTSConfig) -> Result<Self> {
        config.validate()?;

        let player_count = game.player_count();
        let mut current = game.create_state();
        game.copy_state(&mut current, initial);
        let scratch = game.create_state();
        let lookahead = game.create_state();

        let mut info = StateInfo::new(player_count);
        game.inspect(&current, &mut info);
        let tree = MCTSTree::with_capacity(info.current_player, config.initial_capacity)?;

        Ok(Self {
            rng: GameRng::new(config.seed),
            rollout: config.rollout.build(),
            probe: StateInfo::new(player_count),
            game,
            config,
            tree,
            current,
            scratch,
            lookahead,
            info,
            stats: SearchStats::default(),
        })
    }

    /// Run one playout and backpropagate its result.
    pub fn iterate(&mut self) -> Result<()> {
        self.game.copy_state(&mut self.scratch, &self.current);

        let leaf = self.select();
        let node = self.expand(leaf)?;
        let plies = self.simulate();
        trace!(leaf = %node, plies, "rollout finished");
        self.backpropagate(node);

        self.stats.iterations += 1;
        self.stats.rollout_plies += plies;
        Ok(())
    }

    /// Run exactly `iterations` playouts.
    pub fn iterate_n(&mut self, iterations: u32) -> Result<()> {
        let start = Instant::now();
        for _ in 0..iterations {
            self.iterate()?;
        }
        self.stats.time_us += start.elapsed().as_micros() as u64;
        Ok(())
    }

    /// Run playouts until `budget` has elapsed, checking the deadline
    /// between iterations only. Returns the number of iterations run.
    pub fn iterate_for(&mut self, budget: Duration) -> Result<u64> {
        let start = Instant::now();
        let deadline = start + budget;
        let mut done = 0;
        while Instant::now() < deadline {
            self.iterate()?;
            done += 1;
        }
        self.stats.time_us += start.elapsed().as_micros() as u64;
        Ok(done)
    }

    /// Descend from the root while nodes are fully expanded, applying each
    /// chosen move to the scratch state.
    fn select(&mut self) -> NodeId {
        let mut node = self.tree.root();
        while self.tree.get(node).is_fully_expanded() {
            let Some(child) = select_child(&self.tree, node, self.config.exploration_constant)
            else {
                break;
            };
            if let Some(mv) = self.tree.get(child).mv.as_ref() {
                self.game.apply_move(&mut self.scratch, mv);
            }
            node = child;
        }
        node
    }

    /// Add one untried child to `node` when a player is to move there.
    ///
    /// Returns the node simulation starts from: the new child, or `node`
    /// itself when nothing could be expanded.
    fn expand(&mut self, node: NodeId) -> Result<NodeId> {
        self.game.inspect(&self.scratch, &mut self.info);
        if self.info.is_terminal() {
            return Ok(node);
        }

        let mut reservoir = Reservoir::new();
        {
            let game = &self.game;
            let tree = &self.tree;
            let rng = &mut self.rng;
            game.for_each_move(&self.scratch, &mut |mv| {
                if let Probe::Vacant(slot) = tree.probe(node, mv, game.hash_move(mv)) {
                    reservoir.offer_with(rng, || (mv.clone(), slot));
                }
            });
        }
        self.tree.get_mut(node).num_moves_left = reservoir.seen() as i32 - 1;

        let Some((mv, slot)) = reservoir.into_inner() else {
            return Ok(node);
        };

        self.game.apply_move(&mut self.scratch, &mv);
        self.game.inspect(&self.scratch, &mut self.info);
        let instant_winner = if self.info.is_terminal() {
            self.info.winner()
        } else {
            None
        };

        let child = MCTSNode::child(mv, node, self.info.current_player, instant_winner);
        let id = self.tree.insert_child(node, slot, child)?;
        self.stats.expansions += 1;
        trace!(parent = %node, child = %id, ?instant_winner, "expanded");
        Ok(id)
    }

    /// Play the default policy until the scratch state is terminal.
    fn simulate(&mut self) -> u64 {
        let mut plies = 0;
        while let Some(mover) = self.info.current_player {
            let Some(mv) = self.rollout.choose(
                &self.game,
                &self.scratch,
                mover,
                &mut self.lookahead,
                &mut self.probe,
                &mut self.rng,
            ) else {
                break;
            };
            self.game.apply_move(&mut self.scratch, &mv);
            self.game.inspect(&self.scratch, &mut self.info);
            plies += 1;
        }
        plies
    }

    /// Credit each node on the path with the score of the player who chose
    /// the move into it, then count the visit at the root.
    fn backpropagate(&mut self, from: NodeId) {
        let mut node = from;
        while let Some(parent) = self.tree.get(node).parent.get() {
            let score = self
                .tree
                .get(parent)
                .current_player
                .map_or(0, |player| self.info.scores[player]);
            let entry = self.tree.get_mut(node);
            entry.num_visits += 1;
            entry.num_wins += score;
            node = parent;
        }
        self.tree.root_node_mut().num_visits += 1;
    }

    /// The most visited root move.
    pub fn pick_move(&self) -> Result<G::Move> {
        self.pick_move_with_score().map(|(mv, _)| mv)
    }

    /// The most visited root move and its visit count. Ties go to the
    /// first child in list order.
    pub fn pick_move_with_score(&self) -> Result<(G::Move, u32)> {
        let mut best: Option<(NodeId, u32)> = None;
        for child in self.tree.children(self.tree.root()) {
            let visits = self.tree.get(child).num_visits;
            if best.map_or(true, |(_, v)| visits > v) {
                best = Some((child, visits));
            }
        }

        let (id, visits) = best.ok_or(MonteError::NoIterations)?;
        let mv = self.tree.get(id).mv.clone().ok_or(MonteError::NoIterations)?;
        Ok((mv, visits))
    }

    /// Play `mv` for real: advance the authoritative state and re-root the
    /// tree at the matching child, recycling everything else.
    ///
    /// If `mv` was never expanded the new root starts with no statistics.
    pub fn apply_move(&mut self, mv: &G::Move) -> Result<()> {
        let (kept, recycled) = self.tree.detach_root(|candidate| candidate == mv);
        self.game.apply_move(&mut self.current, mv);

        match kept {
            Some(id) => {
                self.tree.promote(id);
                self.stats.roots_reused += 1;
            }
            None => {
                self.game.inspect(&self.current, &mut self.info);
                self.tree.replace_root(MCTSNode::root(self.info.current_player))?;
            }
        }

        self.stats.moves_applied += 1;
        self.stats.nodes_recycled += recycled as u64;
        debug!(
            ?mv,
            reused = kept.is_some(),
            recycled,
            root_visits = self.tree.root_node().num_visits,
            "applied move"
        );
        Ok(())
    }

    /// Statistics for every expanded root move, in list order.
    pub fn root_children(&self) -> Vec<ChildStats<G::Move>> {
        self.tree
            .children(self.tree.root())
            .filter_map(|id| {
                let node = self.tree.get(id);
                node.mv.clone().map(|mv| ChildStats {
                    mv,
                    visits: node.num_visits,
                    wins: node.num_wins,
                    instant_winner: node.instant_winner.is_some(),
                })
            })
            .collect()
    }

    /// Get the authoritative game state.
    #[must_use]
    pub fn state(&self) -> &G::State {
        &self.current
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree<G::Move> {
        &self.tree
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the game adapter.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::games::mnk::{MnkConfig, MnkGame, MnkMove, MnkState};

    fn tic_tac_toe() -> (MnkGame, MnkState) {
        let game = MnkGame::new(MnkConfig::new(3, 3, 3)).unwrap();
        let state = game.create_state();
        (game, state)
    }

    #[test]
    fn test_new_root_matches_state() {
        let (game, state) = tic_tac_toe();
        let search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.current_player, Some(PlayerId::new(0)));
        assert_eq!(root.num_moves_left, -1);
        assert_eq!(root.num_visits, 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let (game, state) = tic_tac_toe();
        let config = MCTSConfig::default().with_exploration(f64::NAN);
        assert!(matches!(
            MCTSSearch::new(game, &state, config),
            Err(MonteError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_iteration_expands_one_root_child() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();

        search.iterate().unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.num_visits, 1);
        assert_eq!(root.num_moves_left, 8);
        let children = search.root_children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].visits, 1);
        assert_eq!(search.stats().expansions, 1);
    }

    #[test]
    fn test_root_fully_expanded_after_nine_iterations() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();

        search.iterate_n(9).unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.num_moves_left, 0);
        assert_eq!(search.root_children().len(), 9);
        assert!(search.root_children().iter().all(|c| c.visits == 1));
    }

    #[test]
    fn test_pick_move_before_iterating_is_error() {
        let (game, state) = tic_tac_toe();
        let search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();

        assert_eq!(search.pick_move(), Err(MonteError::NoIterations));
    }

    #[test]
    fn test_pick_move_is_most_visited() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();
        search.iterate_n(500).unwrap();

        let (mv, score) = search.pick_move_with_score().unwrap();
        let max = search.root_children().iter().map(|c| c.visits).max().unwrap();
        assert_eq!(score, max);
        let first_max = search
            .root_children()
            .into_iter()
            .find(|c| c.visits == max)
            .unwrap();
        assert_eq!(mv, first_max.mv);
    }

    #[test]
    fn test_visits_sum_to_root() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();
        search.iterate_n(300).unwrap();

        let total: u32 = search.root_children().iter().map(|c| c.visits).sum();
        assert_eq!(total, search.tree().root_node().num_visits);
        assert!(search.tree().validate().is_ok());
    }

    #[test]
    fn test_terminal_root_only_counts_visits() {
        let (game, _) = tic_tac_toe();
        let mut state = game.create_state();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game.apply_move(&mut state, &MnkMove::new(x, y));
        }

        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();
        assert_eq!(search.tree().root_node().current_player, None);

        search.iterate_n(5).unwrap();
        assert_eq!(search.tree().root_node().num_visits, 5);
        assert_eq!(search.pick_move(), Err(MonteError::NoIterations));
    }

    #[test]
    fn test_apply_move_reuses_child() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();
        search.iterate_n(200).unwrap();

        let target = search.root_children()[0].clone();
        search.apply_move(&target.mv).unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.num_visits, target.visits);
        assert_eq!(root.num_wins, target.wins);
        assert!(root.is_root());
        assert_eq!(search.stats().roots_reused, 1);
        assert!(search.stats().nodes_recycled > 0);
        assert!(search.tree().validate().is_ok());
    }

    #[test]
    fn test_apply_unexpanded_move_starts_fresh() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();
        search.iterate().unwrap();

        let expanded = search.root_children()[0].mv;
        let other = (0..3)
            .flat_map(|x| (0..3).map(move |y| MnkMove::new(x, y)))
            .find(|m| *m != expanded)
            .unwrap();
        search.apply_move(&other).unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.num_visits, 0);
        assert_eq!(root.num_wins, 0);
        assert_eq!(root.num_moves_left, -1);
        assert_eq!(root.current_player, Some(PlayerId::new(1)));
        assert_eq!(search.state().get(other.x, other.y), Some(PlayerId::new(0)));
        assert_eq!(search.stats().roots_reused, 0);
    }

    #[test]
    fn test_iterate_for_respects_budget() {
        let (game, state) = tic_tac_toe();
        let mut search = MCTSSearch::new(game, &state, MCTSConfig::default()).unwrap();

        let done = search.iterate_for(Duration::from_millis(20)).unwrap();
        assert_eq!(search.stats().iterations, done);
        assert_eq!(u64::from(search.tree().root_node().num_visits), done);
    }
}
