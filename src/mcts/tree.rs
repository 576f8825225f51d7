//! Pooled MCTS tree.
//!
//! The tree owns a [`NodePool`] and the id of the current root. Children of
//! a node are reachable two ways that must always agree: the sibling list
//! (`children` then `next`) for iteration, and the hashed index in
//! [`super::index`] for existence checks.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::index::{self, Probe, Slot};
use super::node::{MCTSNode, NodeId, TRIE_WIDTH};
use super::pool::NodePool;
use crate::core::{MonteError, PlayerId, Result};

/// Search tree rooted at the node for the authoritative game state.
#[derive(Clone, Debug)]
pub struct MCTSTree<M> {
    pool: NodePool<M>,
    root: NodeId,
}

impl<M> MCTSTree<M> {
    /// Create a tree with a single root and room for `capacity` nodes.
    pub fn with_capacity(root_player: Option<PlayerId>, capacity: usize) -> Result<Self> {
        let mut pool = NodePool::with_capacity(capacity.max(1))?;
        let root = pool.acquire(MCTSNode::root(root_player))?;
        Ok(Self { pool, root })
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<M> {
        self.pool.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<M> {
        self.pool.get_mut(id)
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<M> {
        self.get(self.root)
    }

    pub fn root_node_mut(&mut self) -> &mut MCTSNode<M> {
        self.pool.get_mut(self.root)
    }

    /// Iterate over the children of `id` in list order.
    pub fn children(&self, id: NodeId) -> Children<'_, M> {
        Children {
            pool: &self.pool,
            next: self.get(id).children,
        }
    }

    /// Read access to the backing pool.
    #[must_use]
    pub fn pool(&self) -> &NodePool<M> {
        &self.pool
    }

    /// Add `node` as a child of `parent` at an index slot obtained from
    /// [`MCTSTree::probe`].
    ///
    /// The first child becomes the list head; later children are spliced in
    /// right after the head.
    pub fn insert_child(&mut self, parent: NodeId, slot: Slot, node: MCTSNode<M>) -> Result<NodeId> {
        let head = self.get(parent).children;
        let id = self.pool.acquire(node)?;
        index::link(&mut self.pool, slot, id);

        if let Some(head) = head.get() {
            let after_head = self.get(head).next;
            self.get_mut(id).next = after_head;
            self.get_mut(head).next = id;
        }
        Ok(id)
    }

    /// Detach every root child except the first one `keep` accepts, return
    /// every detached subtree and the old root to the pool.
    ///
    /// Returns the kept child, if any, and the number of recycled nodes. The
    /// tree has no valid root until [`MCTSTree::promote`] or
    /// [`MCTSTree::replace_root`] is called.
    pub fn detach_root(&mut self, mut keep: impl FnMut(&M) -> bool) -> (Option<NodeId>, usize) {
        let old_root = self.root;
        let mut kept = None;
        let mut recycle = NodeId::NONE;

        let mut cursor = self.get(old_root).children;
        while let Some(id) = cursor.get() {
            let node = self.get(id);
            cursor = node.next;
            if kept.is_none() && node.mv.as_ref().is_some_and(&mut keep) {
                kept = Some(id);
            } else {
                self.get_mut(id).next = recycle;
                recycle = id;
            }
        }

        // Detached nodes no longer need their sibling links, so the links
        // are reused as the work list.
        let mut recycled = 0;
        while let Some(id) = recycle.get() {
            recycle = self.get(id).next;
            let mut child = self.get(id).children;
            while let Some(c) = child.get() {
                child = self.get(c).next;
                self.get_mut(c).next = recycle;
                recycle = c;
            }
            self.pool.release(id);
            recycled += 1;
        }

        self.pool.release(old_root);
        (kept, recycled + 1)
    }

    /// Make an existing node the root, clearing its links into the old parent.
    pub fn promote(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        node.parent = NodeId::NONE;
        node.next = NodeId::NONE;
        node.slots = [NodeId::NONE; TRIE_WIDTH];
        self.root = id;
    }

    /// Install a freshly created root node.
    pub fn replace_root(&mut self, node: MCTSNode<M>) -> Result<NodeId> {
        let id = self.pool.acquire(node)?;
        self.promote(id);
        Ok(id)
    }

    /// All live nodes reachable from the root, parents before children.
    #[must_use]
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.pool.live_count());
        let mut stack: SmallVec<[NodeId; 64]> = SmallVec::new();
        stack.push(self.root);
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id));
        }
        out
    }

    /// Children of `id` reachable through the hashed index.
    #[must_use]
    pub fn indexed_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        if let Some(head) = self.get(id).children.get() {
            stack.push(head);
        }
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.get(n).slots.iter().filter_map(|s| s.get()));
        }
        out
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut max_depth = 0;
        let mut live_nodes = 0;
        let mut stack: SmallVec<[(NodeId, u32); 64]> = SmallVec::new();
        stack.push((self.root, 0));
        while let Some((id, depth)) = stack.pop() {
            live_nodes += 1;
            max_depth = max_depth.max(depth);
            stack.extend(self.children(id).map(|c| (c, depth + 1)));
        }

        TreeStats {
            live_nodes,
            free_nodes: self.pool.free_count(),
            max_depth,
            root_visits: self.root_node().num_visits,
            root_children: self.children(self.root).count(),
        }
    }
}

impl<M: PartialEq> MCTSTree<M> {
    /// Look `mv` up among the children of `parent`.
    pub fn probe(&self, parent: NodeId, mv: &M, hash: u64) -> Probe {
        index::probe(&self.pool, parent, mv, hash)
    }

    /// The child of `parent` reached by `mv`, if it exists.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, mv: &M, hash: u64) -> Option<NodeId> {
        match self.probe(parent, mv, hash) {
            Probe::Found(id) => Some(id),
            Probe::Vacant(_) => None,
        }
    }

    /// Check the structural invariants of every live node.
    ///
    /// - the child list and the child index hold the same set
    /// - every child points back at its parent
    /// - `num_wins <= num_visits`
    pub fn validate(&self) -> Result<()> {
        let corrupt = |id: NodeId, reason: String| MonteError::CorruptTree {
            node: id.to_string(),
            reason,
        };

        for id in self.walk() {
            let node = self.get(id);
            if node.num_wins > node.num_visits as i32 {
                return Err(corrupt(
                    id,
                    format!("{} wins > {} visits", node.num_wins, node.num_visits),
                ));
            }

            let listed: FxHashSet<NodeId> = self.children(id).collect();
            let indexed: FxHashSet<NodeId> = self.indexed_children(id).into_iter().collect();
            if listed != indexed {
                return Err(corrupt(
                    id,
                    format!("{} listed children vs {} indexed", listed.len(), indexed.len()),
                ));
            }
            if let Some(stray) = listed.iter().find(|c| self.get(**c).parent != id) {
                return Err(corrupt(*stray, format!("parent link does not point at {id}")));
            }
        }
        Ok(())
    }
}

/// Iterator over a node's children in list order.
pub struct Children<'a, M> {
    pool: &'a NodePool<M>,
    next: NodeId,
}

impl<M> Iterator for Children<'_, M> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.get()?;
        self.next = self.pool.get(id).next;
        Some(id)
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes reachable from the root.
    pub live_nodes: usize,

    /// Recycled nodes waiting in the pool.
    pub free_nodes: usize,

    /// Deepest node below the root.
    pub max_depth: u32,

    /// Visits recorded at the root.
    pub root_visits: u32,

    /// Expanded moves at the root.
    pub root_children: usize,
}
