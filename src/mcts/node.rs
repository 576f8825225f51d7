//! MCTS node structure.
//!
//! Nodes live in a pooled arena and reference each other by `NodeId`
//! indices. The parent link is navigation only; ownership of a subtree is
//! expressed by the child list starting at `children` and chained through
//! `next`.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Bits of the move hash consumed per level of the child index.
pub const TRIE_BITS: u32 = 2;

/// Branching factor of the child index.
pub const TRIE_WIDTH: usize = 1 << TRIE_BITS;

/// Mask selecting one level's branch from a hash.
pub const TRIE_MASK: u64 = (TRIE_WIDTH as u64) - 1;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// `None` for the sentinel, `Some(self)` otherwise.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Option<NodeId> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A vertex of the search tree.
#[derive(Clone, Debug)]
pub struct MCTSNode<M> {
    /// Move that led here from the parent. `None` for a freshly created root.
    pub mv: Option<M>,

    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// First child. Head of the sibling list and root slot of the child index.
    pub children: NodeId,

    /// Next sibling in the parent's child list.
    pub next: NodeId,

    /// Branches of the parent's child index below this node.
    pub slots: [NodeId; TRIE_WIDTH],

    /// Untried legal moves; `-1` until the node is first expanded.
    pub num_moves_left: i32,

    /// Player to move in this node's state; `None` for terminal nodes.
    pub current_player: Option<PlayerId>,

    /// Set when the move into this node ends the game with a win for that player.
    pub instant_winner: Option<PlayerId>,

    /// Playouts through this node.
    pub num_visits: u32,

    /// Sum of terminal scores credited to the player who moved into this node.
    pub num_wins: i32,
}

impl<M> MCTSNode<M> {
    /// Create a root node for a state whose mover is `current_player`.
    pub fn root(current_player: Option<PlayerId>) -> Self {
        Self {
            mv: None,
            parent: NodeId::NONE,
            children: NodeId::NONE,
            next: NodeId::NONE,
            slots: [NodeId::NONE; TRIE_WIDTH],
            num_moves_left: -1,
            current_player,
            instant_winner: None,
            num_visits: 0,
            num_wins: 0,
        }
    }

    /// Create an unexpanded child reached from `parent` by `mv`.
    pub fn child(
        mv: M,
        parent: NodeId,
        current_player: Option<PlayerId>,
        instant_winner: Option<PlayerId>,
    ) -> Self {
        Self {
            mv: Some(mv),
            parent,
            current_player,
            instant_winner,
            ..Self::root(current_player)
        }
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// All legal moves at this node have a child.
    #[inline]
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.num_moves_left == 0
    }

    /// Win rate from the perspective of the player who moved into this node.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.num_visits == 0 {
            0.0
        } else {
            self.num_wins as f64 / self.num_visits as f64
        }
    }
}
