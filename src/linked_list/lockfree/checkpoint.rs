//! Observation points inside an insertion.
//!
//! A list built with [`LockFreeList::with_checkpoint`] calls its hook at each
//! [`Stage`] of every insertion. The hook runs on the inserting thread with the
//! insertion paused, so it can mutate the list to reproduce a precise
//! interleaving. Lists built with [`LockFreeList::new`] skip the hook entirely.

use super::{list::LockFreeList, node::ListNode, traits::Link};

/// A step of an insertion at which the checkpoint hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The new node points at its anchors but is not reachable yet.
    BeforeForwardPublish,
    /// The predecessor now points at the new node.
    AfterForwardPublish,
    /// The successor's back link, or the tail, has been updated.
    AfterBackwardPublish,
}

/// What the hook sees at a checkpoint.
pub struct Checkpoint<'l, 'a, L: Link, T> {
    /// The list performing the insertion.
    pub list: &'l LockFreeList<'a, L, T>,
    pub stage: Stage,
    /// The node being inserted.
    pub node: &'a ListNode<L, T>,
    /// The predecessor anchor, `None` for the head.
    pub prev: Option<&'a ListNode<L, T>>,
    /// The successor anchor, `None` for the end of the list.
    pub next: Option<&'a ListNode<L, T>>,
}

/// The boxed hook stored by a list.
pub type CheckpointFn<'a, L, T> = dyn Fn(&Checkpoint<'_, 'a, L, T>) + Send + Sync + 'a;
