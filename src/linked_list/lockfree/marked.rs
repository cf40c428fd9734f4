use core::{
    fmt,
    ptr::{self, NonNull},
    sync::atomic::{AtomicPtr, Ordering},
};

const MARK: usize = 1;

/// An atomic pointer paired with a one-bit mark, read and written as one word.
///
/// The mark lives in the low bit of the address, so the pointee must be at
/// least two-byte aligned. Every node type of this crate is word aligned.
///
/// All operations are sequentially consistent.
pub struct MarkedAtomic<L> {
    combined: AtomicPtr<L>,
}

impl<L> MarkedAtomic<L> {
    /// Creates a null, unmarked pointer.
    pub const fn null() -> Self {
        MarkedAtomic {
            combined: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Creates a pointer with the given target and mark.
    pub fn new(ptr: Option<NonNull<L>>, mark: bool) -> Self {
        MarkedAtomic {
            combined: AtomicPtr::new(Self::pack(ptr, mark)),
        }
    }

    #[inline]
    fn pack(ptr: Option<NonNull<L>>, mark: bool) -> *mut L {
        let raw = ptr.map_or(ptr::null_mut(), NonNull::as_ptr);
        debug_assert_eq!(raw.addr() & MARK, 0, "pointer is not aligned for a mark bit");
        raw.map_addr(|addr| addr | mark as usize)
    }

    #[inline]
    fn unpack(raw: *mut L) -> (Option<NonNull<L>>, bool) {
        (
            NonNull::new(raw.map_addr(|addr| addr & !MARK)),
            raw.addr() & MARK != 0,
        )
    }

    /// Loads the pointer and the mark in a single atomic read.
    #[inline]
    pub fn get(&self) -> (Option<NonNull<L>>, bool) {
        Self::unpack(self.combined.load(Ordering::SeqCst))
    }

    /// Loads only the pointer.
    #[inline]
    pub fn ptr(&self) -> Option<NonNull<L>> {
        self.get().0
    }

    /// Loads only the mark.
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.get().1
    }

    /// Unconditionally stores a pointer and a mark.
    #[inline]
    pub fn set(&self, ptr: Option<NonNull<L>>, mark: bool) {
        self.combined.store(Self::pack(ptr, mark), Ordering::SeqCst);
    }

    /// Replaces `(expected_ptr, expected_mark)` by `(new_ptr, new_mark)`.
    ///
    /// Returns `true` only if the current pair matched and was replaced.
    #[inline]
    pub fn compare_and_set(
        &self,
        expected_ptr: Option<NonNull<L>>,
        new_ptr: Option<NonNull<L>>,
        expected_mark: bool,
        new_mark: bool,
    ) -> bool {
        self.combined
            .compare_exchange(
                Self::pack(expected_ptr, expected_mark),
                Self::pack(new_ptr, new_mark),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }
}

impl<L> Default for MarkedAtomic<L> {
    fn default() -> Self {
        Self::null()
    }
}

impl<L> fmt::Debug for MarkedAtomic<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ptr, marked) = self.get();
        f.debug_struct("MarkedAtomic")
            .field("ptr", &ptr)
            .field("marked", &marked)
            .finish()
    }
}
