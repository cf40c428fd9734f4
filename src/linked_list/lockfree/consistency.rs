//! Structural validation of a quiescent list.

use core::{fmt, sync::atomic::Ordering};

use hashbrown::HashSet;
use tracing::debug;

use super::{list::LockFreeList, node::ListNode, traits::Link};

/// A broken invariant found by [`LockFreeList::check_consistency`].
///
/// Positions count reachable nodes from the head, starting at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A logically deleted node is still reachable.
    DeletedNodeReachable { position: usize },
    /// A reachable node was never published into this list.
    ForeignNode { position: usize },
    /// The forward walk came back to a node it had already visited.
    Cycle { position: usize },
    /// A back link disagrees with the forward link into the node.
    BrokenBackLink { position: usize },
    /// The tail is not the last reachable node.
    TailMismatch,
    /// The size counter disagrees with the forward walk.
    SizeMismatch { size: usize, counted: usize },
    /// The forward walk disagrees with the caller's expectation.
    CountMismatch { expected: usize, counted: usize },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyError::DeletedNodeReachable { position } => {
                write!(f, "deleted node reachable at position {}", position)
            }
            ConsistencyError::ForeignNode { position } => {
                write!(f, "node at position {} does not belong to the list", position)
            }
            ConsistencyError::Cycle { position } => {
                write!(f, "cycle closes at position {}", position)
            }
            ConsistencyError::BrokenBackLink { position } => {
                write!(f, "back link of node at position {} is stale", position)
            }
            ConsistencyError::TailMismatch => write!(f, "tail is not the last node"),
            ConsistencyError::SizeMismatch { size, counted } => {
                write!(f, "size is {} but {} nodes are reachable", size, counted)
            }
            ConsistencyError::CountMismatch { expected, counted } => {
                write!(f, "expected {} nodes but {} are reachable", expected, counted)
            }
        }
    }
}

impl core::error::Error for ConsistencyError {}

impl<'a, L: Link, T> LockFreeList<'a, L, T> {
    /// Validates the structure of the list and returns the number of nodes.
    ///
    /// Checks that no deleted node is reachable, that the forward walk ends,
    /// that back links (if any) mirror forward links, that the tail is the
    /// last node, and that the size counter, and `expected` if given, match
    /// the walk. Matching back links pairwise and the tail against the last
    /// node means the walk back from the tail retraces the forward walk.
    ///
    /// Requires exclusive access, so it can never race a mutator.
    pub fn check_consistency(&mut self, expected: Option<usize>) -> Result<usize, ConsistencyError> {
        let mut visited = HashSet::new();
        let mut counted = 0;
        let mut last: Option<&'a ListNode<L, T>> = None;

        let mut cursor = self.head();
        while let Some(node) = cursor {
            let position = counted;
            if !visited.insert(node.as_link_ptr()) {
                return Err(ConsistencyError::Cycle { position });
            }
            if !node.is_published_in(self.id) {
                return Err(ConsistencyError::ForeignNode { position });
            }
            if node.is_deleted() {
                return Err(ConsistencyError::DeletedNodeReachable { position });
            }
            if let Some(back) = node.link().back() {
                if back.load(Ordering::SeqCst) != Self::raw(last) {
                    return Err(ConsistencyError::BrokenBackLink { position });
                }
            }
            last = Some(node);
            counted += 1;
            cursor = self.node_at(node.link().next().ptr());
        }

        if self.tail.load(Ordering::SeqCst) != Self::raw(last) {
            return Err(ConsistencyError::TailMismatch);
        }

        let size = self.len();
        if size != counted {
            return Err(ConsistencyError::SizeMismatch { size, counted });
        }
        match expected {
            Some(expected) if expected != counted => {
                Err(ConsistencyError::CountMismatch { expected, counted })
            }
            _ => Ok(counted),
        }
    }

    /// Boolean form of [`check_consistency`](Self::check_consistency) that
    /// logs the broken invariant.
    pub fn check_consistence(&mut self, expected: Option<usize>) -> bool {
        match self.check_consistency(expected) {
            Ok(_) => true,
            Err(err) => {
                debug!(list = self.id, error = %err, "list failed its consistency check");
                false
            }
        }
    }
}
