//! MCTS integration tests using the m,n,k adapter.

use monte::core::{MonteError, PlayerId};
use monte::games::mnk::{MnkConfig, MnkGame, MnkMove, MnkState};
use monte::mcts::{MCTSConfig, MCTSSearch, RolloutKind};
use monte::rules::{Game, StateInfo};

fn tic_tac_toe() -> MnkGame {
    MnkGame::new(MnkConfig::new(3, 3, 3)).unwrap()
}

fn search_from(rows: &[&str], config: MCTSConfig) -> MCTSSearch<MnkGame> {
    let board = MnkConfig::new(rows[0].len() as u8, rows.len() as u8, 3);
    let game = MnkGame::new(board).unwrap();
    let state = MnkState::from_rows(board, rows).unwrap();
    MCTSSearch::new(game, &state, config).unwrap()
}

/// Game that hashes every move to the same value.
#[derive(Clone)]
struct Colliding(MnkGame);

impl Game for Colliding {
    type State = MnkState;
    type Move = MnkMove;

    fn player_count(&self) -> usize {
        self.0.player_count()
    }

    fn create_state(&self) -> MnkState {
        self.0.create_state()
    }

    fn apply_move(&self, state: &mut MnkState, mv: &MnkMove) {
        self.0.apply_move(state, mv);
    }

    fn inspect(&self, state: &MnkState, info: &mut StateInfo) {
        self.0.inspect(state, info);
    }

    fn for_each_move(&self, state: &MnkState, submit: &mut dyn FnMut(&MnkMove)) {
        self.0.for_each_move(state, submit);
    }

    fn hash_move(&self, _mv: &MnkMove) -> u64 {
        0
    }
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_mcts_returns_move() {
    let game = tic_tac_toe();
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();

    search.iterate_n(100).unwrap();

    let mv = search.pick_move().unwrap();
    assert!(mv.x < 3 && mv.y < 3);
}

#[test]
fn test_takes_immediate_win() {
    // x to move, (2, 0) completes the top row
    let mut search = search_from(&["xx_", "oo_", "___"], MCTSConfig::default());
    search.iterate_n(2000).unwrap();

    let (mv, visits) = search.pick_move_with_score().unwrap();
    assert_eq!(mv, MnkMove::new(2, 0));
    assert!(visits > 1900, "winning move only got {visits} visits");

    let win = search
        .root_children()
        .into_iter()
        .find(|c| c.mv == mv)
        .unwrap();
    assert!(win.instant_winner);
    assert_eq!(win.wins, win.visits as i32);
}

#[test]
fn test_decisive_rollout_takes_immediate_win() {
    let config = MCTSConfig::default().with_rollout(RolloutKind::Decisive);
    let mut search = search_from(&["xx_", "oo_", "___"], config);
    search.iterate_n(500).unwrap();

    assert_eq!(search.pick_move().unwrap(), MnkMove::new(2, 0));
}

#[test]
fn test_full_board_draw() {
    let search = search_from(&["xox", "xoo", "oxx"], MCTSConfig::default());

    let mut info = StateInfo::new(2);
    search.game().inspect(search.state(), &mut info);
    assert_eq!(info.current_player, None);
    assert_eq!(info.scores[PlayerId::new(0)], 0);
    assert_eq!(info.scores[PlayerId::new(1)], 0);
    assert_eq!(search.tree().root_node().current_player, None);
}

#[test]
fn test_search_on_finished_game() {
    let mut search = search_from(&["xox", "xoo", "oxx"], MCTSConfig::default());
    search.iterate_n(10).unwrap();

    assert_eq!(search.tree().root_node().num_visits, 10);
    assert_eq!(search.stats().expansions, 0);
    assert_eq!(search.pick_move(), Err(MonteError::NoIterations));
}

// =============================================================================
// Determinism Tests
// =============================================================================

#[test]
fn test_mcts_deterministic_with_seed() {
    let game = MnkGame::new(MnkConfig::new(4, 4, 3)).unwrap();
    let start = game.create_state();
    let config = MCTSConfig::default().with_seed(12345);

    let mut search1 = MCTSSearch::new(game.clone(), &start, config.clone()).unwrap();
    let mut search2 = MCTSSearch::new(game, &start, config).unwrap();
    search1.iterate_n(2000).unwrap();
    search2.iterate_n(2000).unwrap();

    assert_eq!(search1.root_children(), search2.root_children());
    assert_eq!(search1.pick_move_with_score(), search2.pick_move_with_score());
    assert_eq!(search1.tree().stats(), search2.tree().stats());
}

#[test]
fn test_deterministic_across_moves() {
    let game = tic_tac_toe();
    let start = game.create_state();
    let config = MCTSConfig::default().with_seed(7);

    let play = |game: MnkGame| {
        let mut search = MCTSSearch::new(game, &start, config.clone()).unwrap();
        let mut moves = Vec::new();
        while search.state().player.is_some() {
            search.iterate_n(300).unwrap();
            let mv = search.pick_move().unwrap();
            search.apply_move(&mv).unwrap();
            moves.push(mv);
        }
        moves
    };

    assert_eq!(play(game.clone()), play(game));
}

// =============================================================================
// Tree Reuse Tests
// =============================================================================

#[test]
fn test_tree_reuse_keeps_subtree() {
    let game = MnkGame::new(MnkConfig::new(4, 4, 3)).unwrap();
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
    search.iterate_n(3000).unwrap();

    let (mv, visits) = search.pick_move_with_score().unwrap();
    let tree = search.tree();
    let child = tree.children(tree.root()).find(|&id| tree.get(id).mv == Some(mv)).unwrap();
    let wins = tree.get(child).num_wins;
    let grandchildren: Vec<_> = tree
        .children(child)
        .map(|id| {
            let node = tree.get(id);
            (node.mv, node.num_visits, node.num_wins)
        })
        .collect();
    assert!(!grandchildren.is_empty());

    search.apply_move(&mv).unwrap();

    let root = search.tree().root_node();
    assert_eq!(root.num_visits, visits);
    assert_eq!(root.num_wins, wins);
    assert_eq!(root.current_player, Some(PlayerId::new(1)));
    let after: Vec<_> = search
        .root_children()
        .into_iter()
        .map(|c| (Some(c.mv), c.visits, c.wins))
        .collect();
    assert_eq!(after, grandchildren);
    assert!(search.tree().validate().is_ok());
}

#[test]
fn test_tree_reuse_then_search_continues() {
    let game = tic_tac_toe();
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
    search.iterate_n(500).unwrap();

    let mv = search.pick_move().unwrap();
    search.apply_move(&mv).unwrap();
    let before = search.tree().root_node().num_visits;
    search.iterate_n(200).unwrap();

    assert_eq!(search.tree().root_node().num_visits, before + 200);
    assert!(search.root_children().iter().all(|c| c.mv != mv));
    assert!(search.tree().validate().is_ok());
}

#[test]
fn test_recycled_nodes_reused_before_growth() {
    let game = MnkGame::new(MnkConfig::new(5, 5, 4)).unwrap();
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
    search.iterate_n(1000).unwrap();

    let mv = search.pick_move().unwrap();
    search.apply_move(&mv).unwrap();

    let pool = search.tree().pool();
    let allocated = pool.allocated();
    let free = pool.free_count();
    assert!(free > 0);

    let batch = free.min(100) as u32;
    search.iterate_n(batch).unwrap();

    assert_eq!(search.tree().pool().allocated(), allocated);
    assert!(search.tree().pool().free_count() < free);
}

#[test]
fn test_unexpanded_move_gives_fresh_root() {
    let game = MnkGame::new(MnkConfig::new(9, 9, 5)).unwrap();
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
    search.iterate_n(3).unwrap();

    let expanded: Vec<_> = search.root_children().into_iter().map(|c| c.mv).collect();
    let fresh = (0..9)
        .flat_map(|x| (0..9).map(move |y| MnkMove::new(x, y)))
        .find(|m| !expanded.contains(m))
        .unwrap();
    search.apply_move(&fresh).unwrap();

    let stats = search.tree().stats();
    assert_eq!(stats.root_visits, 0);
    assert_eq!(stats.root_children, 0);
    assert_eq!(stats.live_nodes, 1);
    assert_eq!(search.stats().nodes_recycled, 4);
}

// =============================================================================
// Score Attribution Tests
// =============================================================================

/// Every terminal win node must be credited to the player who moved into it,
/// which is the mover recorded on its parent. Returns how many were checked.
fn assert_wins_credited_to_mover(search: &MCTSSearch<MnkGame>) -> usize {
    let tree = search.tree();
    let mut checked = 0;
    for id in tree.walk() {
        let node = tree.get(id);
        let Some(winner) = node.instant_winner else {
            continue;
        };
        let parent = tree.get(node.parent);
        assert_eq!(Some(winner), parent.current_player, "node {id}");
        assert_eq!(node.num_wins, node.num_visits as i32, "node {id}");
        checked += 1;
    }
    checked
}

#[test]
fn test_wins_credited_to_mover_at_every_depth() {
    // x to move and must block o's row at (2, 1)
    let mut search = search_from(&["x__", "oo_", "x__"], MCTSConfig::default());
    search.iterate_n(3000).unwrap();

    assert_eq!(search.pick_move().unwrap(), MnkMove::new(2, 1));

    let tree = search.tree();
    let depths: Vec<bool> = tree
        .walk()
        .into_iter()
        .filter(|&id| tree.get(id).instant_winner.is_some())
        .map(|id| tree.get(id).parent == tree.root())
        .collect();
    assert!(depths.iter().any(|&at_root| !at_root), "no win below depth 1");
    assert!(assert_wins_credited_to_mover(&search) > 0);
}

#[test]
fn test_wins_credited_to_mover_after_reuse() {
    let mut search = search_from(&["x__", "oo_", "x__"], MCTSConfig::default());
    search.iterate_n(3000).unwrap();

    search.apply_move(&MnkMove::new(2, 1)).unwrap();
    assert_eq!(search.tree().root_node().current_player, Some(PlayerId::new(1)));
    search.iterate_n(1000).unwrap();

    assert!(assert_wins_credited_to_mover(&search) > 0);
    assert!(search.tree().validate().is_ok());
}

// =============================================================================
// Child Index Tests
// =============================================================================

#[test]
fn test_colliding_hashes_still_find_every_child() {
    let game = Colliding(MnkGame::new(MnkConfig::new(4, 4, 3)).unwrap());
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
    search.iterate_n(1500).unwrap();

    let children = search.root_children();
    assert_eq!(children.len(), 16);
    for (i, a) in children.iter().enumerate() {
        assert!(children[i + 1..].iter().all(|b| b.mv != a.mv));
    }
    assert!(search.tree().validate().is_ok());
}

#[test]
fn test_iteration_counts() {
    let game = tic_tac_toe();
    let start = game.create_state();
    let mut search = MCTSSearch::new(game, &start, MCTSConfig::default()).unwrap();
    search.iterate_n(250).unwrap();

    let stats = search.stats();
    assert_eq!(stats.iterations, 250);
    assert!(stats.expansions <= 250);
    assert_eq!(
        search.tree().stats().live_nodes as u64,
        stats.expansions + 1
    );
}
