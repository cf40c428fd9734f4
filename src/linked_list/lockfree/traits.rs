use core::sync::atomic::AtomicPtr;

use super::marked::MarkedAtomic;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// A trait for the link embedded in a lock-free node.
///
/// Implemented by [`SingleLink`](super::single::SingleLink) and
/// [`DoubleLink`](super::double::DoubleLink) only.
pub trait Link: sealed::Sealed + Default + Send + Sync + Sized {
    /// Get the forward link, which also carries the deletion mark.
    fn next(&self) -> &MarkedAtomic<Self>;

    /// Get the backward link, if this kind of link maintains one.
    ///
    /// The list engine performs every backward-link step through this
    /// method, so a link without a back pointer costs nothing.
    #[inline]
    fn back(&self) -> Option<&AtomicPtr<Self>> {
        None
    }
}

/// A trait for a link with a previous pointer.
pub trait LinkWithPrev: Link {
    /// Get the previous pointer. It is a hint and may be stale.
    fn prev(&self) -> &AtomicPtr<Self>;
}

/// A trait for a node that contains data.
pub trait NodeWithData {
    /// The type of data stored in the node.
    type Data;

    /// Get the data associated with the node
    fn data(&self) -> &Self::Data;

    /// Get a mutable reference to the data associated with the node
    fn data_mut(&mut self) -> &mut Self::Data;
}
