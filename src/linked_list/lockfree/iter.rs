use super::{list::LockFreeList, node::ListNode, traits::Link};

/// An iterator over the live nodes of a [`LockFreeList`].
///
/// Under concurrent mutation the iterator may miss nodes inserted behind it
/// and may yield a node that is removed right after. Each yielded node was
/// live when it was reached.
pub struct Iter<'l, 'a, L: Link, T> {
    list: &'l LockFreeList<'a, L, T>,
    cursor: Option<&'a ListNode<L, T>>,
}

impl<'l, 'a, L: Link, T> Iter<'l, 'a, L, T> {
    pub(super) fn new(list: &'l LockFreeList<'a, L, T>) -> Self {
        let cursor = match list.head() {
            Some(head) if head.is_deleted() => list.next_live(head),
            head => head,
        };
        Iter { list, cursor }
    }
}

impl<'a, L: Link, T> Iterator for Iter<'_, 'a, L, T> {
    type Item = &'a ListNode<L, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.list.next_live(current);
        Some(current)
    }
}
