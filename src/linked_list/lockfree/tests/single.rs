extern crate std;

use std::vec;

use super::{data_of, make_nodes, values};
use crate::linked_list::lockfree::{
    consistency::ConsistencyError,
    single::{SingleLink, SingleList, SingleNode},
    traits::NodeWithData,
};

#[test]
fn test_single_list_push_head_and_tail() {
    let nodes = make_nodes::<SingleLink>(3);
    let mut list = SingleList::new();
    assert!(list.is_empty());
    assert!(list.head().is_none());
    assert!(list.tail().is_none());

    assert!(list.insert_head(&nodes[0]));
    assert_eq!(data_of(list.head()), Some(1));
    assert_eq!(data_of(list.tail()), Some(1));

    assert!(list.append(&nodes[1]));
    assert!(list.insert_head(&nodes[2]));

    assert_eq!(values(&list), vec![3, 1, 2]);
    assert_eq!(data_of(list.head()), Some(3));
    assert_eq!(data_of(list.tail()), Some(2));
    assert_eq!(list.len(), 3);

    assert_eq!(data_of(list.get_next(&nodes[2])), Some(1));
    assert_eq!(data_of(list.get_next(&nodes[0])), Some(2));
    assert!(list.get_next(&nodes[1]).is_none());

    // Singly linked lists find predecessors from the head.
    assert_eq!(data_of(list.get_prev(&nodes[0])), Some(3));
    assert!(list.get_prev(&nodes[2]).is_none());

    assert_eq!(list.check_consistency(Some(3)), Ok(3));
}

#[test]
fn test_single_list_insert_before_target() {
    let nodes = make_nodes::<SingleLink>(5);
    let mut list = SingleList::new();
    assert!(list.append(&nodes[0]));
    assert!(list.append(&nodes[1]));

    // Before the head
    assert!(list.insert(&nodes[2], Some(&nodes[0])));
    assert_eq!(values(&list), vec![3, 1, 2]);
    assert_eq!(data_of(list.head()), Some(3));

    // Before the tail
    assert!(list.insert(&nodes[3], Some(&nodes[1])));
    assert_eq!(values(&list), vec![3, 1, 4, 2]);
    assert_eq!(data_of(list.get_prev(&nodes[1])), Some(4));
    assert_eq!(data_of(list.get_next(&nodes[3])), Some(2));

    // No target appends
    assert!(list.insert(&nodes[4], None));
    assert_eq!(values(&list), vec![3, 1, 4, 2, 5]);
    assert_eq!(data_of(list.tail()), Some(5));

    assert!(list.check_consistence(Some(5)));
}

#[test]
fn test_single_list_insert_between() {
    let nodes = make_nodes::<SingleLink>(4);
    let mut list = SingleList::new();

    // Both anchors empty installs the first node.
    assert!(list.insert_between(&nodes[0], None, None));
    assert!(list.insert_between(&nodes[2], Some(&nodes[0]), None));

    // Not adjacent
    assert!(!list.insert_between(&nodes[1], None, Some(&nodes[2])));
    assert!(!nodes[1].is_linked());

    assert!(list.insert_between(&nodes[1], Some(&nodes[0]), Some(&nodes[2])));
    assert!(list.insert_between(&nodes[3], None, Some(&nodes[0])));
    assert_eq!(values(&list), vec![4, 1, 2, 3]);
    assert_eq!(list.check_consistency(Some(4)), Ok(4));
}

#[test]
fn test_single_list_remove_only_node() {
    let node = SingleNode::new(7);
    let mut list = SingleList::new();
    assert!(list.append(&node));

    assert!(list.remove(&node));
    assert!(node.is_deleted());
    assert!(list.head().is_none());
    assert!(list.tail().is_none());
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(list.check_consistency(Some(0)), Ok(0));
}

#[test]
fn test_single_list_remove_middle() {
    let nodes = make_nodes::<SingleLink>(4);
    let mut list = SingleList::new();
    for node in &nodes {
        assert!(list.append(node));
    }

    assert!(list.remove(&nodes[1]));
    assert!(list.remove(&nodes[2]));
    assert_eq!(values(&list), vec![1, 4]);
    assert_eq!(data_of(list.get_next(&nodes[0])), Some(4));

    // A deleted node still leads to its live successor.
    assert_eq!(data_of(list.get_next(&nodes[1])), Some(4));
    assert!(list.get_prev(&nodes[1]).is_none());

    assert_eq!(list.check_consistency(Some(2)), Ok(2));
}

#[test]
fn test_single_list_remove_is_idempotent() {
    let nodes = make_nodes::<SingleLink>(3);
    let mut list = SingleList::new();
    for node in &nodes {
        assert!(list.append(node));
    }

    assert!(list.remove(&nodes[2]));
    assert!(!list.remove(&nodes[2]));
    assert!(!list.try_remove(&nodes[2]));
    assert!(nodes[2].is_deleted());
    assert_eq!(data_of(list.tail()), Some(2));
    assert_eq!(list.check_consistency(Some(2)), Ok(2));
}

#[test]
fn test_single_list_rejects_reused_and_foreign_nodes() {
    let nodes = make_nodes::<SingleLink>(3);
    let other_node = SingleNode::new(10);
    let mut list = SingleList::new();
    let other = SingleList::new();

    assert!(list.append(&nodes[0]));
    assert!(other.append(&other_node));

    // Already linked
    assert!(!list.append(&nodes[0]));
    assert!(!other.insert_head(&nodes[0]));

    // Removed nodes never come back.
    assert!(list.remove(&nodes[0]));
    assert!(!list.append(&nodes[0]));
    assert!(!list.insert_head(&nodes[0]));

    // Anchors and targets of another list
    assert!(!list.insert(&nodes[1], Some(&other_node)));
    assert!(!list.insert_between(&nodes[1], Some(&other_node), None));
    assert!(!list.remove(&other_node));
    assert!(list.get_next(&other_node).is_none());
    assert!(!nodes[1].is_linked());

    assert!(list.append(&nodes[1]));
    assert!(list.append(&nodes[2]));
    assert_eq!(values(&list), vec![2, 3]);
    assert_eq!(list.check_consistency(Some(2)), Ok(2));
}

#[test]
fn test_single_list_pop_head_and_tail() {
    let nodes = make_nodes::<SingleLink>(3);
    let mut list = SingleList::new();
    for node in &nodes {
        assert!(list.append(node));
    }

    assert_eq!(list.pop_head().map(|node| *node.data()), Some(1));
    assert_eq!(list.pop_tail().map(|node| *node.data()), Some(3));
    assert_eq!(values(&list), vec![2]);
    assert_eq!(list.check_consistency(Some(1)), Ok(1));

    assert_eq!(list.pop_tail().map(|node| *node.data()), Some(2));
    assert!(list.pop_head().is_none());
    assert!(list.pop_tail().is_none());
    assert_eq!(list.check_consistency(Some(0)), Ok(0));
}

#[test]
fn test_single_list_into_inner() {
    let mut node = SingleNode::new(1);
    *node.data_mut() = 2;
    {
        let list = SingleList::new();
        assert!(list.append(&node));
        assert_eq!(list.iter().count(), 1);
    }
    assert!(node.is_linked());
    assert_eq!(node.into_inner(), 2);
}

#[test]
fn test_single_list_check_reports_count_mismatch() {
    let nodes = make_nodes::<SingleLink>(3);
    let mut list = SingleList::new();
    for node in &nodes {
        assert!(list.append(node));
    }

    let err = list.check_consistency(Some(5)).unwrap_err();
    assert_eq!(
        err,
        ConsistencyError::CountMismatch {
            expected: 5,
            counted: 3
        }
    );
    assert_eq!(std::format!("{}", err), "expected 5 nodes but 3 are reachable");
    assert!(!list.check_consistence(Some(5)));
    assert!(list.check_consistence(None));
}
