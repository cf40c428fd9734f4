//! Repair passes.
//!
//! Each pass validates before it writes and re-validates after, so any thread
//! may run any pass at any time and racing passes settle on the same state.

use core::{ptr::NonNull, sync::atomic::Ordering};

use tracing::trace;

use super::{list::LockFreeList, node::ListNode, traits::Link};

impl<'a, L: Link, T> LockFreeList<'a, L, T> {
    /// Whether anything around a freshly published node changed while it was
    /// being published.
    pub(super) fn anchors_moved(
        &self,
        node: &'a ListNode<L, T>,
        prev: Option<&'a ListNode<L, T>>,
        next: Option<&'a ListNode<L, T>>,
    ) -> bool {
        if self.link_of(prev).get() != (Some(node.as_link_ptr()), false)
            || node.link().next().get() != (Self::ptr_of(next), false)
        {
            return true;
        }
        if let Some(back) = node.link().back() {
            if back.load(Ordering::SeqCst) != Self::raw(prev) {
                return true;
            }
        }
        match next {
            Some(next) => next
                .link()
                .back()
                .is_some_and(|back| back.load(Ordering::SeqCst) != Self::raw(Some(node))),
            None => self.tail.load(Ordering::SeqCst) != Self::raw(Some(node)),
        }
    }

    /// Repairs the back links around `node` and the tail after the anchors of
    /// an insertion moved.
    pub(super) fn fix_insert(
        &self,
        node: &'a ListNode<L, T>,
        prev: Option<&'a ListNode<L, T>>,
        next: Option<&'a ListNode<L, T>>,
    ) {
        trace!(list = self.id, head_anchor = prev.is_none(), "repairing an insertion");
        self.fix_prev(node);
        if let Some(next) = next {
            let successor = if next.is_deleted() {
                self.next_live(next)
            } else {
                Some(next)
            };
            if let Some(successor) = successor {
                self.fix_prev(successor);
            }
        }
        self.fix_tail();
    }

    /// Splices a logically deleted node out, then repairs the back link of
    /// its live successor and the tail.
    pub(super) fn fix_delete(&self, node: &'a ListNode<L, T>) {
        self.unlink(node);
        if let Some(successor) = self.next_live(node) {
            self.fix_prev(successor);
        }
        self.fix_tail();
    }

    /// Returns once `node` is unreachable from the head.
    fn unlink(&self, node: &'a ListNode<L, T>) {
        let this = Some(node.as_link_ptr());
        // A node has a single reachable predecessor, so one winning splice
        // is enough.
        while let Some(pred) = self.locate(Some(node)) {
            let succ = node.link().next().ptr();
            if self.link_of(pred).compare_and_set(this, succ, false, false) {
                return;
            }
            trace!(list = self.id, "splice lost a race, retrying");
        }
    }

    /// Makes the back link of a live node exact. No-op for singly linked lists.
    pub(super) fn fix_prev(&self, node: &'a ListNode<L, T>) {
        let Some(back) = node.link().back() else {
            return;
        };
        let this = Some(node.as_link_ptr());
        loop {
            if node.is_deleted() {
                return;
            }
            let hint = back.load(Ordering::SeqCst);
            if self.link_of(self.node_at(NonNull::new(hint))).get() == (this, false) {
                return;
            }
            let Some(pred) = self.locate(Some(node)) else {
                return;
            };
            trace!(list = self.id, "moving a stale back link");
            let _ = back.compare_exchange(hint, Self::raw(pred), Ordering::SeqCst, Ordering::SeqCst);
        }
    }

    /// Makes the tail point at the last node, or at nothing for an empty list.
    pub(super) fn fix_tail(&self) {
        loop {
            let tail = self.tail.load(Ordering::SeqCst);
            let tail_node = self.node_at(NonNull::new(tail));
            if self.link_of(tail_node).get() == (None, false) {
                return;
            }
            let Some(last) = self.search(tail_node, None) else {
                continue;
            };
            trace!(list = self.id, "moving a stale tail");
            let _ = self
                .tail
                .compare_exchange(tail, Self::raw(last), Ordering::SeqCst, Ordering::SeqCst);
        }
    }
}
