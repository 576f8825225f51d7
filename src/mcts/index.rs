//! Hashed child index.
//!
//! Each node's children form a sparse trie keyed by the move hash,
//! `TRIE_BITS` bits per level, low bits first. The trie is rooted at the
//! parent's `children` head, and every child carries the branch slots for
//! the level below it. Existence checks therefore cost O(trie depth) no
//! matter how many siblings exist.
//!
//! A hash match never proves identity: every populated slot is compared
//! with `==` before descending.

use super::node::{NodeId, TRIE_BITS, TRIE_MASK};
use super::pool::NodePool;

/// A place in the index where a new child can be linked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The parent has no children yet; the child becomes the list head.
    Head(NodeId),
    /// Branch `usize` of an existing child.
    Branch(NodeId, usize),
}

/// Outcome of an index lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// A child with an equal move exists.
    Found(NodeId),
    /// No such child; it would be linked at this slot.
    Vacant(Slot),
}

/// Look `mv` up among the children of `parent`.
pub fn probe<M: PartialEq>(pool: &NodePool<M>, parent: NodeId, mv: &M, hash: u64) -> Probe {
    let mut slot = Slot::Head(parent);
    let mut current = pool.get(parent).children;
    let mut hash = hash;

    while let Some(id) = current.get() {
        let node = pool.get(id);
        if node.mv.as_ref() == Some(mv) {
            return Probe::Found(id);
        }
        let branch = (hash & TRIE_MASK) as usize;
        slot = Slot::Branch(id, branch);
        current = node.slots[branch];
        hash >>= TRIE_BITS;
    }

    Probe::Vacant(slot)
}

/// Link `child` into a vacant slot returned by [`probe`].
pub fn link<M>(pool: &mut NodePool<M>, slot: Slot, child: NodeId) {
    match slot {
        Slot::Head(parent) => {
            debug_assert!(pool.get(parent).children.is_none());
            pool.get_mut(parent).children = child;
        }
        Slot::Branch(owner, branch) => {
            debug_assert!(pool.get(owner).slots[branch].is_none());
            pool.get_mut(owner).slots[branch] = child;
        }
    }
}
