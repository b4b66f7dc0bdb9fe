use crate::coarsen::Coarsener;
use crate::column::{ColumnAccess, OwnedColumn};
use crate::error::{Error, Result};
use crate::mover::{MoveStrategy, Mover};
use crate::partition::Partition;
use crate::rng::SessionRng;

/// State of one optimisation protocol: assign, repeated moves and
/// accumulations, flush or tidy, then the next assign.
///
/// A session has exactly one writer; every operation takes `&mut self` and
/// finishes before returning. All indices here are 0-based; the 1-based
/// boundary lives in [`crate::command`].
#[derive(Debug, Clone)]
pub struct Session {
    partition: Option<Partition>,
    mover: Mover,
    coarsener: Coarsener,
    rng: SessionRng,
    expected_nodes: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with a time-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(SessionRng::from_time())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SessionRng::from_seed(seed))
    }

    fn with_rng(rng: SessionRng) -> Self {
        Self {
            partition: None,
            mover: Mover::new(),
            coarsener: Coarsener::new(),
            rng,
            expected_nodes: None,
        }
    }

    /// Requires every later `assign` to label exactly `node_count` nodes.
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.expected_nodes = Some(node_count);
        self
    }

    pub fn partition(&self) -> Result<&Partition> {
        self.partition.as_ref().ok_or(Error::Unassigned)
    }

    pub fn rng_mut(&mut self) -> &mut SessionRng {
        &mut self.rng
    }

    /// Replaces the partition with one built from positive `labels` and
    /// starts a fresh coarsening cycle for it.
    pub fn assign(&mut self, labels: &[u64]) -> Result<()> {
        if let Some(expected) = self.expected_nodes {
            if labels.len() != expected {
                return Err(Error::Shape {
                    expected,
                    found: labels.len(),
                });
            }
        }
        let partition = Partition::from_labels(labels)?;
        self.coarsener.begin(&partition);
        self.partition = Some(partition);
        Ok(())
    }

    /// Moves `node` with `strategy`; returns the achieved gain.
    pub fn move_node<C>(&mut self, strategy: MoveStrategy, node: usize, column: &C) -> Result<f64>
    where
        C: ColumnAccess + ?Sized,
    {
        let partition = self.partition.as_mut().ok_or(Error::Unassigned)?;
        self.mover
            .apply(strategy, partition, node, column, &mut self.rng)
    }

    pub fn accumulate<C>(&mut self, column: &C) -> Result<()>
    where
        C: ColumnAccess + ?Sized,
    {
        let partition = self.partition.as_ref().ok_or(Error::Unassigned)?;
        self.coarsener.accumulate(partition, column)
    }

    /// Accumulates every column, or none of them if any has the wrong length.
    pub fn accumulate_all<C>(&mut self, columns: &[C]) -> Result<()>
    where
        C: ColumnAccess,
    {
        let partition = self.partition.as_ref().ok_or(Error::Unassigned)?;
        self.coarsener.accumulate_all(partition, columns)
    }

    pub fn flush(&mut self) -> Result<OwnedColumn> {
        let partition = self.partition.as_ref().ok_or(Error::Unassigned)?;
        // Moves may have opened new group slots since the cycle began.
        self.coarsener.reserve_groups(partition.group_count());
        Ok(self.coarsener.flush())
    }

    pub fn tidy(&self) -> Result<Vec<u32>> {
        Ok(self.partition()?.tidy())
    }

    pub fn nodes_of(&self, group: u32) -> Result<&[u32]> {
        let partition = self.partition()?;
        if group as usize >= partition.group_count() {
            return Err(Error::GroupOutOfRange {
                group: group as usize,
                count: partition.group_count(),
            });
        }
        Ok(partition.nodes_in(group))
    }
}
