use crate::column::{ColumnAccess, OwnedColumn};
use crate::error::{Error, Result};
use crate::partition::Partition;

/// Collapses node-indexed columns into group-indexed columns.
///
/// A cycle is `begin`, any number of `accumulate` calls, then `flush`, which
/// hands out the summed column and leaves the accumulator zeroed for the next
/// cycle. Once any input since `begin` was sparse, every flushed column is
/// sparse until the next `begin`; otherwise flushed columns are dense.
#[derive(Debug, Clone, Default)]
pub struct Coarsener {
    totals: Vec<f64>,
    saw_sparse: bool,
}

impl Coarsener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a cycle for `partition`: one zeroed bucket per group slot.
    pub fn begin(&mut self, partition: &Partition) {
        self.totals.clear();
        self.totals.resize(partition.group_count(), 0.0);
        self.saw_sparse = false;
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.totals.len()
    }

    /// Grows the accumulator to at least `group_count` zeroed buckets.
    pub fn reserve_groups(&mut self, group_count: usize) {
        if self.totals.len() < group_count {
            self.totals.resize(group_count, 0.0);
        }
    }

    /// Adds `column` into the per-group buckets.
    ///
    /// Fails without touching the buckets if the column length differs from
    /// the partition's node count.
    pub fn accumulate<C>(&mut self, partition: &Partition, column: &C) -> Result<()>
    where
        C: ColumnAccess + ?Sized,
    {
        if column.node_count() != partition.node_count() {
            return Err(Error::Shape {
                expected: partition.node_count(),
                found: column.node_count(),
            });
        }
        self.reserve_groups(partition.group_count());

        if column.is_sparse() {
            for k in 0..column.stored_len() {
                let (row, value) = column.stored(k);
                self.totals[partition.group_of(row) as usize] += value;
            }
            self.saw_sparse = true;
        } else {
            for (g, total) in self.totals.iter_mut().enumerate() {
                for &v in partition.nodes_in(g as u32) {
                    *total += column.value_at(v as usize);
                }
            }
        }
        Ok(())
    }

    /// Adds several columns, e.g. the columns of one packed matrix.
    ///
    /// Every length is checked before the first column is added.
    pub fn accumulate_all<C>(&mut self, partition: &Partition, columns: &[C]) -> Result<()>
    where
        C: ColumnAccess,
    {
        if let Some(bad) = columns
            .iter()
            .find(|c| c.node_count() != partition.node_count())
        {
            return Err(Error::Shape {
                expected: partition.node_count(),
                found: bad.node_count(),
            });
        }
        for column in columns {
            self.accumulate(partition, column)?;
        }
        Ok(())
    }

    /// Returns the accumulated column and zeroes the accumulator. The storage
    /// mode is kept, so an empty follow-up flush matches the previous one.
    pub fn flush(&mut self) -> OwnedColumn {
        let out = if self.saw_sparse {
            let mut rows = Vec::new();
            let mut values = Vec::new();
            for (g, &total) in self.totals.iter().enumerate() {
                if total != 0.0 {
                    rows.push(g as u32);
                    values.push(total);
                }
            }
            OwnedColumn::Sparse {
                len: self.totals.len(),
                rows,
                values,
            }
        } else {
            OwnedColumn::Dense(self.totals.clone())
        };

        self.totals.fill(0.0);
        out
    }
}

/// One-shot reduction of a full column, without a persistent accumulator.
pub fn reduce<C>(partition: &Partition, column: &C) -> Result<OwnedColumn>
where
    C: ColumnAccess + ?Sized,
{
    let mut coarsener = Coarsener::new();
    coarsener.begin(partition);
    coarsener.accumulate(partition, column)?;
    Ok(coarsener.flush())
}
