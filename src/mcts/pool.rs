//! Free-list node pool.
//!
//! Nodes are stored in a flat `Vec` and addressed by `NodeId`. Released
//! slots go on a free-index stack and are handed out again before the arena
//! grows, so steady-state search with tree reuse stops allocating.

use crate::core::{MonteError, Result};

use super::node::{MCTSNode, NodeId};

/// Arena of tree nodes with a free-index stack.
#[derive(Clone, Debug)]
pub struct NodePool<M> {
    nodes: Vec<MCTSNode<M>>,
    free: Vec<NodeId>,
}

impl<M> Default for NodePool<M> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<M> NodePool<M> {
    /// Create a pool with room for `capacity` nodes before the first growth.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut pool = Self::default();
        pool.reserve(capacity)?;
        Ok(pool)
    }

    /// Store `node` in a recycled slot if one is free, otherwise in a new one.
    ///
    /// The slot is overwritten entirely; nothing from a previous occupant
    /// survives.
    pub fn acquire(&mut self, node: MCTSNode<M>) -> Result<NodeId> {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0 as usize] = node;
            return Ok(id);
        }

        if self.nodes.len() >= NodeId::NONE.0 as usize {
            return Err(MonteError::OutOfMemory { requested: 1 });
        }
        if self.nodes.len() == self.nodes.capacity() {
            self.reserve(self.nodes.len().max(64))?;
        }

        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    /// Return a slot to the free list. The node is not cleared.
    pub fn release(&mut self, id: NodeId) {
        debug_assert!(!id.is_none());
        debug_assert!((id.0 as usize) < self.nodes.len());
        self.free.push(id);
    }

    /// Grow both the arena and the free stack so `release` never reallocates.
    fn reserve(&mut self, additional: usize) -> Result<()> {
        let oom = |_| MonteError::OutOfMemory { requested: additional };
        self.nodes.try_reserve(additional).map_err(oom)?;
        let target = self.nodes.capacity();
        self.free
            .try_reserve(target.saturating_sub(self.free.len()))
            .map_err(oom)?;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<M> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<M> {
        &mut self.nodes[id.0 as usize]
    }

    /// Slots ever allocated (live plus free).
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    /// Slots waiting on the free list.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Slots currently holding tree nodes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}
