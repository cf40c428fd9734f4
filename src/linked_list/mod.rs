//! Lock-free linked lists.
//!
//! The lists in this module are intrusive: the caller owns the nodes and lends
//! them to a list for the list's whole lifetime. Any number of threads may
//! insert and remove concurrently through a shared reference to the list.
//!
//! # Examples
//!
//! ```
//! use mola_lockfree_list::linked_list::lockfree::{
//!     double::{DoubleList, DoubleNode},
//!     traits::NodeWithData,
//! };
//!
//! let node1 = DoubleNode::new(1);
//! let node2 = DoubleNode::new(2);
//! let node3 = DoubleNode::new(3);
//!
//! let mut list = DoubleList::new();
//! assert!(list.append(&node1));
//! assert!(list.append(&node3));
//! assert!(list.insert(&node2, Some(&node3)));
//!
//! let values: Vec<i32> = list.iter().map(|node| *node.data()).collect();
//! assert_eq!(values, vec![1, 2, 3]);
//!
//! assert!(list.remove(&node2));
//! assert!(node2.is_deleted());
//! assert_eq!(list.get_prev(&node3).map(|node| *node.data()), Some(1));
//! assert_eq!(list.check_consistency(Some(2)), Ok(2));
//! ```
pub mod lockfree;
