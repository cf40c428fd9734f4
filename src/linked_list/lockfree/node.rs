use core::{
    fmt,
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::traits::{Link, LinkWithPrev, NodeWithData};

const DETACHED: usize = 0;
const PUBLISHED: usize = 1;

/// A node of a lock-free list.
///
/// The node is owned by the caller and lent to a list for the list's whole
/// lifetime. The link is the first field, so a pointer to the link is a
/// pointer to the node.
///
/// A node can be inserted once. After it has been removed it stays deleted
/// forever and every further insertion of it is rejected.
#[repr(C)]
pub struct ListNode<L, T> {
    link: L,
    /// `0` while detached, `id << 1` while list `id` is inserting it, and
    /// `id << 1 | 1` once it has been published into list `id`.
    owner: AtomicUsize,
    data: T,
}

impl<L: Link, T> ListNode<L, T> {
    /// Creates a detached node holding `data`.
    pub fn new(data: T) -> Self {
        ListNode {
            link: L::default(),
            owner: AtomicUsize::new(DETACHED),
            data,
        }
    }

    /// Consumes the node and returns its data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Get the current successor, deleted or not.
    ///
    /// The pointer is only safe to dereference while the list that owns this
    /// node is alive. Prefer [`LockFreeList::get_next`](super::list::LockFreeList::get_next).
    #[inline]
    pub fn next(&self) -> Option<NonNull<Self>> {
        self.link.next().ptr().map(NonNull::cast)
    }

    /// Whether the node has been logically deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.link.next().is_marked()
    }

    /// Whether the node has been published into a list.
    ///
    /// Stays `true` after removal.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.owner.load(Ordering::SeqCst) & PUBLISHED != 0
    }

    #[inline]
    pub(crate) fn link(&self) -> &L {
        &self.link
    }

    #[inline]
    pub(crate) fn as_link_ptr(&self) -> NonNull<L> {
        NonNull::from(self).cast()
    }

    /// # Safety
    ///
    /// `ptr` must come from [`ListNode::as_link_ptr`] on a node that is
    /// borrowed for at least `'n`.
    #[inline]
    pub(crate) unsafe fn from_link_ptr<'n>(ptr: NonNull<L>) -> &'n Self {
        unsafe { ptr.cast::<Self>().as_ref() }
    }

    /// Claims a detached node for list `id`.
    #[inline]
    pub(crate) fn claim(&self, id: usize) -> bool {
        self.owner
            .compare_exchange(DETACHED, id << 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Gives a claimed but unpublished node back.
    #[inline]
    pub(crate) fn release(&self) {
        self.owner.store(DETACHED, Ordering::SeqCst);
    }

    #[inline]
    pub(crate) fn publish(&self, id: usize) {
        self.owner.store(id << 1 | PUBLISHED, Ordering::SeqCst);
    }

    /// Whether list `id` has claimed the node, published or not.
    #[inline]
    pub(crate) fn is_owned_by(&self, id: usize) -> bool {
        self.owner.load(Ordering::SeqCst) >> 1 == id
    }

    #[inline]
    pub(crate) fn is_published_in(&self, id: usize) -> bool {
        self.owner.load(Ordering::SeqCst) == id << 1 | PUBLISHED
    }
}

impl<L: LinkWithPrev, T> ListNode<L, T> {
    /// Get the recorded predecessor. It may be stale.
    ///
    /// The pointer is only safe to dereference while the list that owns this
    /// node is alive. Prefer [`LockFreeList::get_prev`](super::list::LockFreeList::get_prev).
    #[inline]
    pub fn prev(&self) -> Option<NonNull<Self>> {
        NonNull::new(self.link.prev().load(Ordering::SeqCst)).map(NonNull::cast)
    }
}

impl<L, T> NodeWithData for ListNode<L, T> {
    type Data = T;

    #[inline]
    fn data(&self) -> &T {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

impl<L: Link, T: Default> Default for ListNode<L, T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<L: Link, T: fmt::Debug> fmt::Debug for ListNode<L, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListNode")
            .field("data", &self.data)
            .field("linked", &self.is_linked())
            .field("deleted", &self.is_deleted())
            .finish()
    }
}
