use crate::coarsen::Coarsener;
use crate::column::{Column, ColumnAccess, CscMatrix, DenseColumn, OwnedColumn};
use crate::error::{Error, Result};
use crate::partition::Partition;

/// Square modularity matrix, dense (column-major) or column-compressed.
///
/// Column `j` holds node `j`'s contributions to every node; the matrix is
/// expected to be symmetric, as modularity matrices are.
#[derive(Debug, Clone, PartialEq)]
pub enum ModularityMatrix {
    Dense { n: usize, values: Vec<f64> },
    Sparse(CscMatrix),
}

impl ModularityMatrix {
    pub fn dense(n: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != n * n {
            return Err(Error::Shape {
                expected: n * n,
                found: values.len(),
            });
        }
        Ok(ModularityMatrix::Dense { n, values })
    }

    pub fn sparse(matrix: CscMatrix) -> Result<Self> {
        if matrix.n_rows() != matrix.n_cols() {
            return Err(Error::NotSquare {
                rows: matrix.n_rows(),
                cols: matrix.n_cols(),
            });
        }
        Ok(ModularityMatrix::Sparse(matrix))
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        match self {
            ModularityMatrix::Dense { n, .. } => *n,
            ModularityMatrix::Sparse(m) => m.n_cols(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, ModularityMatrix::Sparse(_))
    }

    /// Column of node `node`. Panics if `node >= node_count()`.
    pub fn column(&self, node: usize) -> Column<'_> {
        match self {
            ModularityMatrix::Dense { n, values } => {
                Column::Dense(DenseColumn::new(&values[node * n..(node + 1) * n]))
            }
            ModularityMatrix::Sparse(m) => Column::Sparse(m.column(node)),
        }
    }

    /// Sum of `B_ij` over all ordered pairs `(i, j)` in the same group.
    pub fn quality(&self, partition: &Partition) -> Result<f64> {
        if partition.node_count() != self.node_count() {
            return Err(Error::Shape {
                expected: self.node_count(),
                found: partition.node_count(),
            });
        }
        let mut q = 0.0;
        for j in 0..self.node_count() {
            let column = self.column(j);
            let g = partition.group_of(j);
            for k in 0..column.stored_len() {
                let (i, value) = column.stored(k);
                if partition.group_of(i) == g {
                    q += value;
                }
            }
        }
        Ok(q)
    }

    /// Reduced matrix with one node per group slot of `partition`.
    ///
    /// Column `g` of the result is built by accumulating the columns of every
    /// member of `g` and flushing once, so entry `(h, g)` is the sum of
    /// `B_ij` over `i` in `h` and `j` in `g`.
    pub fn coarsen(&self, partition: &Partition, coarsener: &mut Coarsener) -> Result<Self> {
        if partition.node_count() != self.node_count() {
            return Err(Error::Shape {
                expected: self.node_count(),
                found: partition.node_count(),
            });
        }
        let k = partition.group_count();
        coarsener.begin(partition);

        let mut columns: Vec<OwnedColumn> = Vec::with_capacity(k);
        for g in 0..k as u32 {
            for &v in partition.nodes_in(g) {
                coarsener.accumulate(partition, &self.column(v as usize))?;
            }
            columns.push(coarsener.flush());
        }

        if self.is_sparse() {
            let mut col_offsets = Vec::with_capacity(k + 1);
            let mut rows = Vec::new();
            let mut values = Vec::new();
            col_offsets.push(0u32);
            for column in columns.iter() {
                for s in 0..column.stored_len() {
                    let (r, v) = column.stored(s);
                    if v != 0.0 {
                        rows.push(r as u32);
                        values.push(v);
                    }
                }
                col_offsets.push(rows.len() as u32);
            }
            Ok(ModularityMatrix::Sparse(CscMatrix::new(
                k,
                col_offsets,
                rows,
                values,
            )?))
        } else {
            let mut values = Vec::with_capacity(k * k);
            for column in columns.iter() {
                values.extend(column.to_dense());
            }
            Ok(ModularityMatrix::Dense { n: k, values })
        }
    }
}
