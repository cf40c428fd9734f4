//! # Lock-free Linked List
//!
//! This module provides a lock-free, intrusive linked list in two flavours:
//! singly linked and doubly linked. Both are the same engine,
//! [`list::LockFreeList`], parameterized by the link type embedded in every node.
//!
//! ## Core Components
//!
//! - [`marked::MarkedAtomic`]: An atomic pointer carrying a one-bit deletion mark.
//! - [`traits`]: The `Link` capability trait and friends.
//! - [`single::SingleLink`] and [`double::DoubleLink`]: Link types for singly and doubly linked lists.
//! - [`node::ListNode`]: The node type, owned by the caller and lent to a list.
//! - [`list::LockFreeList`]: The list engine.
//! - [`checkpoint`]: A hook that observes the steps of an insertion.
//! - [`consistency`]: A single-threaded structural validator.
//!
//! ## Protocol
//!
//! Removal is two-phase. A node is first deleted logically by setting the mark
//! on its `next` link, which also freezes that link. It is then spliced out by
//! whichever thread reaches it first. Every link CAS expects the mark to be
//! clear, so nothing can ever be linked behind a deleted node.
//!
//! Back links and the tail are hints. Every thread that changes the
//! predecessor of a node, or the end of the list, repairs them afterwards, and
//! every repair re-validates after it writes. Once the list is quiescent they
//! are exact.
//!
//! ## Ownership
//!
//! A list borrows its nodes for `'a`. Nodes are never freed while a list can
//! observe them, and a node may belong to at most one list, once.

pub mod marked;
pub mod traits;
pub mod single;
pub mod double;
pub mod node;
pub mod list;
pub mod checkpoint;
pub mod consistency;
pub mod iter;

mod backoff;
mod repair;

#[cfg(test)]
mod tests;
