use crate::error::{Error, Result};
use rustc_hash::FxHashMap;

/// Node to group assignment with per-group member lists.
///
/// Members are stored in one growable list per group; `node_slot[v]` is the
/// position of `v` inside its group's list, so a move is two O(1) list edits.
/// Group ids are slots: a group that becomes empty keeps its id until the next
/// assignment, and `group_count` never shrinks on its own.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    node_group: Vec<u32>,
    node_slot: Vec<u32>,
    members: Vec<Vec<u32>>,
}

impl Partition {
    /// Every node in its own group, group id equal to node id.
    pub fn singletons(node_count: usize) -> Self {
        Self {
            node_group: (0..node_count as u32).collect(),
            node_slot: vec![0; node_count],
            members: (0..node_count as u32).map(|v| vec![v]).collect(),
        }
    }

    /// Builds a partition from arbitrary positive labels.
    ///
    /// Equal labels map to the same group; groups are numbered densely from 0
    /// in order of first appearance, so `[5, 5, 2, 2]` becomes `[0, 0, 1, 1]`.
    pub fn from_labels(labels: &[u64]) -> Result<Self> {
        let mut renumber: FxHashMap<u64, u32> = FxHashMap::default();
        let mut node_group = Vec::with_capacity(labels.len());
        for (position, &label) in labels.iter().enumerate() {
            if label == 0 {
                return Err(Error::InvalidLabel { position });
            }
            let next = renumber.len() as u32;
            node_group.push(*renumber.entry(label).or_insert(next));
        }
        Ok(Self::from_groups(node_group, renumber.len()))
    }

    fn from_groups(node_group: Vec<u32>, group_count: usize) -> Self {
        let mut members: Vec<Vec<u32>> = vec![Vec::new(); group_count];
        let mut node_slot = Vec::with_capacity(node_group.len());
        for (v, &g) in node_group.iter().enumerate() {
            let list = &mut members[g as usize];
            node_slot.push(list.len() as u32);
            list.push(v as u32);
        }
        Self {
            node_group,
            node_slot,
            members,
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_group.len()
    }

    /// Number of group slots, including slots that are currently empty.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.members.len()
    }

    pub fn nonempty_group_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_empty()).count()
    }

    #[inline]
    pub fn group_of(&self, node: usize) -> u32 {
        self.node_group[node]
    }

    #[inline]
    pub fn assignment(&self) -> &[u32] {
        &self.node_group
    }

    /// Members of `group` in arbitrary order; empty for unused ids.
    #[inline]
    pub fn nodes_in(&self, group: u32) -> &[u32] {
        self.members
            .get(group as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Moves `node` into `group`. Returns whether the assignment changed.
    ///
    /// `group` may be a previously unused id, bounded by the larger of the
    /// node count and the current group count so that a partition never holds
    /// more slots than it could fill.
    pub fn move_node(&mut self, node: usize, group: u32) -> Result<bool> {
        let count = self.node_count();
        if node >= count {
            return Err(Error::NodeOutOfRange { node, count });
        }
        let limit = count.max(self.group_count());
        if group as usize >= limit {
            return Err(Error::GroupOutOfRange {
                group: group as usize,
                count: limit,
            });
        }

        let old = self.node_group[node];
        if old == group {
            return Ok(false);
        }

        // Detach first so the node is never listed in two groups.
        let slot = self.node_slot[node] as usize;
        let old_list = &mut self.members[old as usize];
        old_list.swap_remove(slot);
        if let Some(&shifted) = old_list.get(slot) {
            self.node_slot[shifted as usize] = slot as u32;
        }

        if group as usize >= self.members.len() {
            self.members.resize_with(group as usize + 1, Vec::new);
        }
        let new_list = &mut self.members[group as usize];
        self.node_slot[node] = new_list.len() as u32;
        new_list.push(node as u32);
        self.node_group[node] = group;

        Ok(true)
    }

    /// Compact labels `0..K` ordered by first appearance in node order.
    ///
    /// Empty groups get no label. The internal numbering is left untouched.
    pub fn tidy(&self) -> Vec<u32> {
        const UNSEEN: u32 = u32::MAX;
        let mut relabel = vec![UNSEEN; self.group_count()];
        let mut next = 0u32;
        self.node_group
            .iter()
            .map(|&g| {
                let slot = &mut relabel[g as usize];
                if *slot == UNSEEN {
                    *slot = next;
                    next += 1;
                }
                *slot
            })
            .collect()
    }
}
