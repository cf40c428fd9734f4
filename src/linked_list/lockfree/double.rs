use core::sync::atomic::AtomicPtr;

use super::{
    list::LockFreeList,
    marked::MarkedAtomic,
    node::ListNode,
    traits::{Link, LinkWithPrev, sealed::Sealed},
};

/// A doubly linked node.
pub type DoubleNode<T> = ListNode<DoubleLink, T>;

/// A lock-free doubly linked list.
pub type DoubleList<'a, T> = LockFreeList<'a, DoubleLink, T>;

/// The link of a doubly linked list.
///
/// The previous pointer is not part of the marked word. It is maintained
/// best-effort and repaired by the list after every change of predecessor.
#[derive(Debug, Default)]
pub struct DoubleLink {
    next: MarkedAtomic<DoubleLink>,
    prev: AtomicPtr<DoubleLink>,
}

impl Sealed for DoubleLink {}

impl Link for DoubleLink {
    #[inline]
    fn next(&self) -> &MarkedAtomic<Self> {
        &self.next
    }

    #[inline]
    fn back(&self) -> Option<&AtomicPtr<Self>> {
        Some(&self.prev)
    }
}

impl LinkWithPrev for DoubleLink {
    #[inline]
    fn prev(&self) -> &AtomicPtr<Self> {
        &self.prev
    }
}
