use super::{
    list::LockFreeList,
    marked::MarkedAtomic,
    node::ListNode,
    traits::{Link, sealed::Sealed},
};

/// A singly linked node.
pub type SingleNode<T> = ListNode<SingleLink, T>;

/// A lock-free singly linked list.
pub type SingleList<'a, T> = LockFreeList<'a, SingleLink, T>;

/// The link of a singly linked list: a forward pointer and the deletion mark.
#[derive(Debug, Default)]
pub struct SingleLink {
    next: MarkedAtomic<SingleLink>,
}

impl Sealed for SingleLink {}

impl Link for SingleLink {
    #[inline]
    fn next(&self) -> &MarkedAtomic<Self> {
        &self.next
    }
}
