extern crate std;

use std::vec::Vec;

use super::{list::LockFreeList, node::ListNode, traits::{Link, NodeWithData}};

mod single;

/// Nodes holding `1..=count`.
fn make_nodes<L: Link>(count: usize) -> Vec<ListNode<L, i32>> {
    (1..=count as i32).map(ListNode::new).collect()
}

fn values<L: Link>(list: &LockFreeList<'_, L, i32>) -> Vec<i32> {
    list.iter().map(|node| *node.data()).collect()
}

fn data_of<L: Link>(node: Option<&ListNode<L, i32>>) -> Option<i32> {
    node.map(|node| *node.data())
}
