use alloc::boxed::Box;
use core::{
    fmt,
    marker::PhantomData,
    ptr::{self, NonNull},
    sync::atomic::{AtomicPtr, AtomicUsize, Ordering},
};

use crossbeam_utils::CachePadded;
use tracing::trace;

use super::{
    backoff::backoff,
    checkpoint::{Checkpoint, CheckpointFn, Stage},
    iter::Iter,
    marked::MarkedAtomic,
    node::ListNode,
    traits::Link,
};

static NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(1);

/// A lock-free intrusive linked list.
///
/// The list borrows its nodes for `'a` and never allocates or frees them.
/// Every operation takes `&self`, so the list can be shared between threads.
///
/// Mutators come in pairs. The plain form retries with backoff until the
/// operation takes effect. The `try_` form gives up and returns `false` at the
/// first sign of a concurrent change.
///
/// The link type decides the flavour: [`SingleLink`](super::single::SingleLink)
/// for a singly linked list, [`DoubleLink`](super::double::DoubleLink) for a
/// doubly linked one whose back links are kept exact once threads quiesce.
pub struct LockFreeList<'a, L: Link, T> {
    pub(super) id: usize,
    /// Acts as the link of a virtual node in front of the first node.
    /// It is never marked.
    pub(super) head: CachePadded<MarkedAtomic<L>>,
    pub(super) tail: CachePadded<AtomicPtr<L>>,
    pub(super) size: CachePadded<AtomicUsize>,
    checkpoint: Option<Box<CheckpointFn<'a, L, T>>>,
    _marker: PhantomData<&'a ListNode<L, T>>,
}

impl<'a, L: Link, T> LockFreeList<'a, L, T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates an empty list that calls `hook` at every [`Stage`] of every
    /// insertion.
    pub fn with_checkpoint<F>(hook: F) -> Self
    where
        F: Fn(&Checkpoint<'_, 'a, L, T>) + Send + Sync + 'a,
    {
        Self::build(Some(Box::new(hook)))
    }

    fn build(checkpoint: Option<Box<CheckpointFn<'a, L, T>>>) -> Self {
        LockFreeList {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            head: CachePadded::new(MarkedAtomic::null()),
            tail: CachePadded::new(AtomicPtr::new(ptr::null_mut())),
            size: CachePadded::new(AtomicUsize::new(0)),
            checkpoint,
            _marker: PhantomData,
        }
    }

    /// Get the first node. It may already be deleted.
    #[inline]
    pub fn head(&self) -> Option<&'a ListNode<L, T>> {
        self.node_at(self.head.ptr())
    }

    /// Get the tail hint. It is the last node once threads quiesce.
    #[inline]
    pub fn tail(&self) -> Option<&'a ListNode<L, T>> {
        self.node_at(NonNull::new(self.tail.load(Ordering::SeqCst)))
    }

    /// Get the number of nodes.
    ///
    /// Concurrent mutators update it after the fact, so it is exact only
    /// while no mutator is running.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.load(Ordering::SeqCst)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.ptr().is_none()
    }

    /// Get an iterator over the live nodes, front to back.
    pub fn iter(&self) -> Iter<'_, 'a, L, T> {
        Iter::new(self)
    }

    /// Get the nearest live node after `node`.
    ///
    /// Works for deleted nodes too, by following their frozen forward link.
    /// Returns `None` for a node that was never published into this list.
    pub fn get_next(&self, node: &'a ListNode<L, T>) -> Option<&'a ListNode<L, T>> {
        // Only a published node's links are known to point into this list.
        if !node.is_published_in(self.id) {
            return None;
        }
        self.next_live(node)
    }

    /// Get the nearest live node before `node`.
    ///
    /// For a live node this is its exact predecessor. A doubly linked list
    /// starts the search from the back link; a singly linked one searches
    /// from the head. For a deleted node a doubly linked list follows back
    /// links to the first live node, and a singly linked one returns `None`.
    /// Returns `None` for a node that was never published into this list.
    pub fn get_prev(&self, node: &'a ListNode<L, T>) -> Option<&'a ListNode<L, T>> {
        if !node.is_published_in(self.id) {
            return None;
        }
        if !node.is_deleted() {
            if let Some(pred) = self.locate(Some(node)) {
                return pred;
            }
        }
        self.live_back_hint(node)
    }

    /// Links `node` between the adjacent anchors `prev` and `next`.
    ///
    /// `None` for `prev` means the head, `None` for `next` means the end of the
    /// list; both `None` installs `node` into an empty list. Fails without
    /// retrying if the anchors are no longer adjacent, if `node` is not a
    /// fresh node, or if an anchor does not belong to this list.
    pub fn insert_between(
        &self,
        node: &'a ListNode<L, T>,
        prev: Option<&'a ListNode<L, T>>,
        next: Option<&'a ListNode<L, T>>,
    ) -> bool {
        let anchored = |anchor: Option<&'a ListNode<L, T>>| {
            anchor.is_none_or(|anchor| self.is_member(anchor, true))
        };
        if !anchored(prev) || !anchored(next) || !node.claim(self.id) {
            return false;
        }
        let linked = self.link_between(node, prev, next);
        if !linked {
            node.release();
        }
        linked
    }

    /// Inserts `node` in front of `target`, retrying until it succeeds.
    ///
    /// `None` appends. A deleted target stands for its nearest live successor.
    pub fn insert(&self, node: &'a ListNode<L, T>, target: Option<&'a ListNode<L, T>>) -> bool {
        self.insert_before(node, target, true)
    }

    /// Like [`insert`](Self::insert) but makes a single attempt.
    pub fn try_insert(
        &self,
        node: &'a ListNode<L, T>,
        target: Option<&'a ListNode<L, T>>,
    ) -> bool {
        self.insert_before(node, target, false)
    }

    /// Inserts `node` at the front, retrying until it succeeds.
    pub fn insert_head(&self, node: &'a ListNode<L, T>) -> bool {
        self.claim_and_link(node, true, || Some((None, self.head())))
    }

    /// Like [`insert_head`](Self::insert_head) but makes a single attempt.
    pub fn try_insert_head(&self, node: &'a ListNode<L, T>) -> bool {
        self.claim_and_link(node, false, || Some((None, self.head())))
    }

    /// Inserts `node` at the end, retrying until it succeeds.
    pub fn append(&self, node: &'a ListNode<L, T>) -> bool {
        self.claim_and_link(node, true, || self.locate(None).map(|last| (last, None)))
    }

    /// Like [`append`](Self::append) but makes a single attempt.
    pub fn try_append(&self, node: &'a ListNode<L, T>) -> bool {
        self.claim_and_link(node, false, || self.locate(None).map(|last| (last, None)))
    }

    /// Removes `node`.
    ///
    /// Returns `false` if the node is not in this list or was already
    /// removed. The node stays deleted forever.
    pub fn remove(&self, node: &'a ListNode<L, T>) -> bool {
        self.remove_with(node, true)
    }

    /// Like [`remove`](Self::remove) but gives up if the node's successor
    /// changes while it is being marked.
    pub fn try_remove(&self, node: &'a ListNode<L, T>) -> bool {
        self.remove_with(node, false)
    }

    /// Removes and returns the first node.
    ///
    /// Returns `None` if the list is empty or another thread removed that
    /// node first.
    pub fn pop_head(&self) -> Option<&'a ListNode<L, T>> {
        let head = self.head()?;
        self.remove(head).then_some(head)
    }

    /// Removes and returns the last node.
    ///
    /// Returns `None` if the list is empty or another thread removed that
    /// node first.
    pub fn pop_tail(&self) -> Option<&'a ListNode<L, T>> {
        let mut step = 0;
        loop {
            let last = self.locate(None).flatten()?;
            if !last.is_published_in(self.id) {
                // Reachable, so its inserter is about to publish it.
                backoff(&mut step);
                continue;
            }
            // Only a node that is still last may be marked.
            if last.link().next().compare_and_set(None, None, false, true) {
                self.size.fetch_sub(1, Ordering::SeqCst);
                self.fix_delete(last);
                return Some(last);
            }
            if last.is_deleted() {
                return None;
            }
            backoff(&mut step);
        }
    }

    fn insert_before(
        &self,
        node: &'a ListNode<L, T>,
        target: Option<&'a ListNode<L, T>>,
        force: bool,
    ) -> bool {
        if target.is_some_and(|target| !self.is_member(target, force)) {
            return false;
        }
        self.claim_and_link(node, force, || {
            let next = match target {
                Some(target) if target.is_deleted() => self.next_live(target),
                other => other,
            };
            self.locate(next).map(|prev| (prev, next))
        })
    }

    /// Claims `node` and links it between the anchors produced by `anchors`,
    /// asking for fresh anchors after every lost race when `force` is set.
    fn claim_and_link<F>(&self, node: &'a ListNode<L, T>, force: bool, mut anchors: F) -> bool
    where
        F: FnMut() -> Option<(Option<&'a ListNode<L, T>>, Option<&'a ListNode<L, T>>)>,
    {
        if !node.claim(self.id) {
            return false;
        }
        let mut step = 0;
        loop {
            if let Some((prev, next)) = anchors() {
                if self.link_between(node, prev, next) {
                    return true;
                }
            }
            if !force {
                node.release();
                return false;
            }
            backoff(&mut step);
        }
    }

    /// Publishes a claimed node between `prev` and `next`.
    fn link_between(
        &self,
        node: &'a ListNode<L, T>,
        prev: Option<&'a ListNode<L, T>>,
        next: Option<&'a ListNode<L, T>>,
    ) -> bool {
        let link = node.link();
        link.next().set(Self::ptr_of(next), false);
        if let Some(back) = link.back() {
            back.store(Self::raw(prev), Ordering::SeqCst);
        }
        self.reach(Stage::BeforeForwardPublish, node, prev, next);

        if !self
            .link_of(prev)
            .compare_and_set(Self::ptr_of(next), Some(node.as_link_ptr()), false, false)
        {
            trace!(list = self.id, "forward publish lost its anchors");
            return false;
        }
        // Counted before publication, and removals require publication, so
        // the size never drops below zero.
        self.size.fetch_add(1, Ordering::SeqCst);
        node.publish(self.id);
        self.reach(Stage::AfterForwardPublish, node, prev, next);

        // Best effort, the repair below settles any loss.
        match next {
            Some(next) => {
                if let Some(back) = next.link().back() {
                    let _ = back.compare_exchange(
                        Self::raw(prev),
                        Self::raw(Some(node)),
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    );
                }
            }
            None => {
                let _ = self.tail.compare_exchange(
                    Self::raw(prev),
                    Self::raw(Some(node)),
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                );
            }
        }
        self.reach(Stage::AfterBackwardPublish, node, prev, next);

        if self.anchors_moved(node, prev, next) {
            self.fix_insert(node, prev, next);
        }
        true
    }

    fn remove_with(&self, node: &'a ListNode<L, T>, force: bool) -> bool {
        if !self.is_member(node, force) {
            return false;
        }
        let next_link = node.link().next();
        let mut step = 0;
        loop {
            let (next, marked) = next_link.get();
            if marked {
                return false;
            }
            if next_link.compare_and_set(next, next, false, true) {
                break;
            }
            if !force {
                return false;
            }
            backoff(&mut step);
        }
        self.size.fetch_sub(1, Ordering::SeqCst);
        self.fix_delete(node);
        true
    }

    /// Whether `node` is published in this list.
    ///
    /// When `force` is set, a node that is already reachable but whose
    /// inserter has not yet recorded the publication is waited for.
    fn is_member(&self, node: &'a ListNode<L, T>, force: bool) -> bool {
        let mut step = 0;
        loop {
            if node.is_published_in(self.id) {
                return true;
            }
            // The search from the head never reads the links of `node`, which
            // may belong to another list by now.
            if !force || !node.is_owned_by(self.id) || self.search(None, Some(node)).is_none() {
                return false;
            }
            backoff(&mut step);
        }
    }

    #[inline]
    fn reach(
        &self,
        stage: Stage,
        node: &'a ListNode<L, T>,
        prev: Option<&'a ListNode<L, T>>,
        next: Option<&'a ListNode<L, T>>,
    ) {
        if let Some(hook) = &self.checkpoint {
            hook(&Checkpoint {
                list: self,
                stage,
                node,
                prev,
                next,
            });
        }
    }

    /// Walks forward from `start` (`None` is the head) to the position whose
    /// link holds `target` unmarked, splicing out every deleted node it
    /// passes. `target == None` finds the last node.
    ///
    /// Returns `None` if `target` is not reachable from `start`.
    pub(super) fn search(
        &self,
        start: Option<&'a ListNode<L, T>>,
        target: Option<&'a ListNode<L, T>>,
    ) -> Option<Option<&'a ListNode<L, T>>> {
        let target = Self::ptr_of(target);
        let mut pred = start;
        loop {
            let (curr, pred_marked) = self.link_of(pred).get();
            if pred_marked {
                // The walk stands on a deleted node, start over.
                pred = None;
                continue;
            }
            if curr == target {
                return Some(pred);
            }
            let curr_node = self.node_at(curr)?;
            let (succ, curr_marked) = curr_node.link().next().get();
            if curr_marked {
                // A failed splice reloads `pred` on the next round.
                self.link_of(pred).compare_and_set(curr, succ, false, false);
                continue;
            }
            pred = Some(curr_node);
        }
    }

    /// Finds the live position in front of `target`, starting from the best
    /// hint available: the back links for a node, the tail for the end.
    pub(super) fn locate(
        &self,
        target: Option<&'a ListNode<L, T>>,
    ) -> Option<Option<&'a ListNode<L, T>>> {
        let hint = match target {
            Some(target) => self.live_back_hint(target),
            None => self.tail(),
        };
        match self.search(hint, target) {
            None if hint.is_some() => self.search(None, target),
            found => found,
        }
    }

    /// The first live node found by following back links from `node`.
    /// Always `None` for a singly linked list.
    pub(super) fn live_back_hint(&self, node: &'a ListNode<L, T>) -> Option<&'a ListNode<L, T>> {
        let mut cursor = self.back_of(node);
        while let Some(candidate) = cursor {
            if !candidate.is_deleted() {
                return Some(candidate);
            }
            cursor = self.back_of(candidate);
        }
        None
    }

    pub(super) fn next_live(&self, node: &'a ListNode<L, T>) -> Option<&'a ListNode<L, T>> {
        let mut cursor = self.load_link(Some(node));
        while let Some(candidate) = cursor {
            if !candidate.is_deleted() {
                return Some(candidate);
            }
            cursor = self.load_link(Some(candidate));
        }
        None
    }

    pub(super) fn back_of(&self, node: &'a ListNode<L, T>) -> Option<&'a ListNode<L, T>> {
        let back = node.link().back()?;
        self.node_at(NonNull::new(back.load(Ordering::SeqCst)))
    }

    /// The link that follows `pos`: the head for `None`, else the node's
    /// forward link.
    #[inline]
    pub(super) fn link_of<'s>(&'s self, pos: Option<&'a ListNode<L, T>>) -> &'s MarkedAtomic<L> {
        match pos {
            Some(node) => node.link().next(),
            None => &self.head,
        }
    }

    #[inline]
    fn load_link(&self, pos: Option<&'a ListNode<L, T>>) -> Option<&'a ListNode<L, T>> {
        self.node_at(self.link_of(pos).ptr())
    }

    #[inline]
    pub(super) fn node_at(&self, ptr: Option<NonNull<L>>) -> Option<&'a ListNode<L, T>> {
        // SAFETY: the head, the tail and every link of a node published in
        // this list only ever point at nodes claimed by this list, and those are
        // borrowed for `'a`.
        ptr.map(|ptr| unsafe { ListNode::from_link_ptr(ptr) })
    }

    #[inline]
    pub(super) fn ptr_of(node: Option<&ListNode<L, T>>) -> Option<NonNull<L>> {
        node.map(ListNode::as_link_ptr)
    }

    #[inline]
    pub(super) fn raw(node: Option<&ListNode<L, T>>) -> *mut L {
        Self::ptr_of(node).map_or(ptr::null_mut(), NonNull::as_ptr)
    }
}

impl<L: Link, T> Default for LockFreeList<'_, L, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'l, 'a, L: Link, T> IntoIterator for &'l LockFreeList<'a, L, T> {
    type Item = &'a ListNode<L, T>;
    type IntoIter = Iter<'l, 'a, L, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<L: Link, T> fmt::Debug for LockFreeList<'_, L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeList")
            .field("id", &self.id)
            .field("len", &self.len())
            .field("checkpoint", &self.checkpoint.is_some())
            .finish()
    }
}
