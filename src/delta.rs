use crate::candidates::CandidateSet;
use crate::column::ColumnAccess;
use crate::error::{Error, Result};
use crate::partition::Partition;

/// Smallest modularity change counted as an improvement.
pub const IMPROVEMENT_TOLERANCE: f64 = 1e-10;

/// Computes, for one node, the modularity change of moving it into each
/// candidate group.
///
/// Candidates are the node's current group plus the groups of every node with
/// a strictly positive entry in the column. Groups reachable only through zero
/// or negative entries are never candidates, even if their summed contribution
/// would be positive.
///
/// The engine owns its scratch buffers and is meant to be reused across moves.
#[derive(Debug, Clone, Default)]
pub struct DeltaEngine {
    candidates: CandidateSet,
    deltas: Vec<f64>,
}

/// Per-candidate deltas from one [`DeltaEngine::compute`] call, in candidate
/// insertion order (current group first).
#[derive(Debug, Clone, Copy)]
pub struct MoveDeltas<'a> {
    candidates: &'a CandidateSet,
    deltas: &'a [f64],
}

impl<'a> MoveDeltas<'a> {
    #[inline]
    pub fn current_group(&self) -> u32 {
        self.candidates.as_slice()[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn delta(&self, group: u32) -> Option<f64> {
        self.candidates.position(group).map(|p| self.deltas[p])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + 'a {
        self.candidates
            .as_slice()
            .iter()
            .copied()
            .zip(self.deltas.iter().copied())
    }

    /// Candidates whose delta exceeds [`IMPROVEMENT_TOLERANCE`].
    pub fn improving(&self) -> impl Iterator<Item = (u32, f64)> + 'a {
        self.iter().filter(|&(_, d)| d > IMPROVEMENT_TOLERANCE)
    }
}

impl DeltaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute<'a, C>(
        &'a mut self,
        partition: &Partition,
        node: usize,
        column: &C,
    ) -> Result<MoveDeltas<'a>>
    where
        C: ColumnAccess + ?Sized,
    {
        let count = partition.node_count();
        if node >= count {
            return Err(Error::NodeOutOfRange { node, count });
        }
        if column.node_count() != count {
            return Err(Error::Shape {
                expected: count,
                found: column.node_count(),
            });
        }

        let current = partition.group_of(node);
        let candidates = &mut self.candidates;
        candidates.reset(partition.group_count());
        candidates.insert(current);
        for k in 0..column.stored_len() {
            let (row, value) = column.stored(k);
            if value > 0.0 {
                candidates.insert(partition.group_of(row));
            }
        }

        let deltas = &mut self.deltas;
        deltas.clear();
        deltas.resize(candidates.len(), 0.0);

        if column.is_sparse() {
            // One pass over the stored entries, bucketed by the row's group.
            for k in 0..column.stored_len() {
                let (row, value) = column.stored(k);
                if let Some(p) = candidates.position(partition.group_of(row)) {
                    deltas[p] += value;
                }
            }
        } else {
            for (p, &g) in candidates.as_slice().iter().enumerate() {
                deltas[p] = partition
                    .nodes_in(g)
                    .iter()
                    .map(|&j| column.value_at(j as usize))
                    .sum();
            }
        }

        // Staying is measured without the node's own diagonal term; every
        // candidate is then taken relative to staying, which makes it 0.
        deltas[0] -= column.value_at(node);
        let stay = deltas[0];
        for d in deltas.iter_mut() {
            *d -= stay;
        }

        Ok(MoveDeltas {
            candidates: &self.candidates,
            deltas: &self.deltas,
        })
    }
}
