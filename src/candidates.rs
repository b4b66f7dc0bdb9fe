const ABSENT: u32 = u32::MAX;

/// Insertion-ordered set of group ids with O(1) membership and position lookup.
///
/// `redirect[g]` holds the position of `g` in `members`, or `u32::MAX` when `g`
/// is absent. Resetting only clears the slots that were set, so the cost of
/// reuse is proportional to the number of inserted groups rather than to the
/// group count.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    redirect: Vec<u32>,
    members: Vec<u32>,
}

impl CandidateSet {
    pub fn with_group_count(group_count: usize) -> Self {
        Self {
            redirect: vec![ABSENT; group_count],
            members: Vec::new(),
        }
    }

    /// Empties the set and makes sure every id below `group_count` can be inserted.
    pub fn reset(&mut self, group_count: usize) {
        for &g in self.members.iter() {
            self.redirect[g as usize] = ABSENT;
        }
        self.members.clear();
        if self.redirect.len() < group_count {
            self.redirect.resize(group_count, ABSENT);
        }
    }

    /// Inserts `group` if absent and returns its position in insertion order.
    #[inline]
    pub fn insert(&mut self, group: u32) -> usize {
        let g = group as usize;
        if g >= self.redirect.len() {
            self.redirect.resize(g + 1, ABSENT);
        }
        if self.redirect[g] == ABSENT {
            self.redirect[g] = self.members.len() as u32;
            self.members.push(group);
        }
        self.redirect[g] as usize
    }

    #[inline]
    pub fn contains(&self, group: u32) -> bool {
        self.position(group).is_some()
    }

    #[inline]
    pub fn position(&self, group: u32) -> Option<usize> {
        match self.redirect.get(group as usize) {
            Some(&p) if p != ABSENT => Some(p as usize),
            _ => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.members.iter().copied()
    }
}
