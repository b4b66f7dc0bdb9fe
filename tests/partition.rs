use genlouvain::candidates::CandidateSet;
use genlouvain::error::Error;
use genlouvain::partition::Partition;

fn assert_consistent(p: &Partition) {
    for v in 0..p.node_count() {
        let g = p.group_of(v);
        assert!(
            p.nodes_in(g).contains(&(v as u32)),
            "node {} missing from its group {}",
            v,
            g
        );
    }
    let listed: usize = (0..p.group_count() as u32).map(|g| p.nodes_in(g).len()).sum();
    assert_eq!(listed, p.node_count());
}

fn sorted(nodes: &[u32]) -> Vec<u32> {
    let mut out = nodes.to_vec();
    out.sort_unstable();
    out
}

#[test]
fn assign_renumbers_non_contiguous_labels() {
    let p = Partition::from_labels(&[5, 5, 2, 2]).unwrap();
    assert_eq!(p.group_count(), 2);
    assert_eq!(p.assignment(), &[0, 0, 1, 1]);
    assert_eq!(p.tidy(), vec![0, 0, 1, 1]);
    assert_consistent(&p);
}

#[test]
fn assign_rejects_zero_label() {
    let err = Partition::from_labels(&[1, 0, 2]).unwrap_err();
    assert_eq!(err, Error::InvalidLabel { position: 1 });
}

#[test]
fn members_stay_consistent_across_moves() {
    let mut p = Partition::from_labels(&[1, 1, 2, 2, 3, 3]).unwrap();
    let moves = [(0usize, 2u32), (3, 0), (5, 1), (1, 2), (0, 0), (4, 1)];
    for (node, group) in moves {
        p.move_node(node, group).unwrap();
        assert_eq!(p.group_of(node), group);
        assert_consistent(&p);
    }
}

#[test]
fn move_and_back_restores_membership() {
    let mut p = Partition::from_labels(&[1, 1, 1, 2, 2]).unwrap();
    let before: Vec<Vec<u32>> = (0..p.group_count() as u32)
        .map(|g| sorted(p.nodes_in(g)))
        .collect();

    let original = p.group_of(1);
    assert!(p.move_node(1, 1).unwrap());
    assert!(p.move_node(1, original).unwrap());

    let after: Vec<Vec<u32>> = (0..p.group_count() as u32)
        .map(|g| sorted(p.nodes_in(g)))
        .collect();
    assert_eq!(before, after);
    assert_consistent(&p);
}

#[test]
fn move_to_same_group_is_a_no_op() {
    let mut p = Partition::from_labels(&[1, 2]).unwrap();
    assert!(!p.move_node(0, 0).unwrap());
    assert_eq!(p.nodes_in(0), &[0]);
}

#[test]
fn move_into_unused_group_grows_slots() {
    let mut p = Partition::from_labels(&[1, 1, 1]).unwrap();
    assert_eq!(p.group_count(), 1);
    p.move_node(2, 2).unwrap();
    assert_eq!(p.group_count(), 3);
    assert!(p.nodes_in(1).is_empty());
    assert_eq!(p.nodes_in(2), &[2]);
    assert_eq!(p.nonempty_group_count(), 2);
    assert_consistent(&p);
}

#[test]
fn move_validates_before_mutating() {
    let mut p = Partition::from_labels(&[1, 2]).unwrap();
    assert_eq!(
        p.move_node(2, 0).unwrap_err(),
        Error::NodeOutOfRange { node: 2, count: 2 }
    );
    assert!(matches!(
        p.move_node(0, 10).unwrap_err(),
        Error::GroupOutOfRange { group: 10, .. }
    ));
    assert_eq!(p.assignment(), &[0, 1]);
}

#[test]
fn tidy_drops_empty_groups_and_orders_by_first_appearance() {
    let mut p = Partition::singletons(4);
    p.move_node(0, 3).unwrap();
    p.move_node(2, 3).unwrap();
    // groups: node0 -> 3, node1 -> 1, node2 -> 3, node3 -> 3
    assert_eq!(p.tidy(), vec![0, 1, 0, 0]);
    // internal ids are untouched
    assert_eq!(p.group_of(0), 3);
}

#[test]
fn candidate_set_keeps_insertion_order_and_resets() {
    let mut set = CandidateSet::with_group_count(8);
    assert_eq!(set.insert(5), 0);
    assert_eq!(set.insert(2), 1);
    assert_eq!(set.insert(5), 0);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![5, 2]);
    assert!(set.contains(2));
    assert!(!set.contains(3));

    set.reset(8);
    assert!(set.is_empty());
    assert!(!set.contains(5));
    assert_eq!(set.insert(3), 0);
    assert_eq!(set.position(3), Some(0));

    // ids past the initial sizing are still accepted
    assert_eq!(set.insert(20), 1);
    assert!(set.contains(20));
}
