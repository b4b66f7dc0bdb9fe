//! Node-indexed columns of a modularity matrix.
//!
//! The move engine and the coarsener are written once against
//! [`ColumnAccess`]; dense and sparse storage are thin adapters over it.

use crate::error::{Error, Result};
use rustc_hash::FxHashSet;

/// Read access to one column of numbers indexed by node.
///
/// Stored entries are the entries a column keeps explicitly: every entry for
/// dense storage, the listed `(row, value)` pairs for sparse storage. Entries
/// that are not stored are zero.
pub trait ColumnAccess {
    /// Logical length of the column (number of nodes).
    fn node_count(&self) -> usize;

    fn value_at(&self, node: usize) -> f64;

    fn stored_len(&self) -> usize;

    /// The `k`-th stored entry as `(row, value)`.
    fn stored(&self, k: usize) -> (usize, f64);

    fn is_sparse(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct DenseColumn<'a> {
    values: &'a [f64],
}

impl<'a> DenseColumn<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self { values }
    }
}

impl ColumnAccess for DenseColumn<'_> {
    #[inline]
    fn node_count(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn value_at(&self, node: usize) -> f64 {
        self.values[node]
    }

    #[inline]
    fn stored_len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn stored(&self, k: usize) -> (usize, f64) {
        (k, self.values[k])
    }

    #[inline]
    fn is_sparse(&self) -> bool {
        false
    }
}

/// Fails if a row index repeats. Ascending rows are checked without hashing.
fn check_distinct_rows(rows: &[u32]) -> Result<()> {
    if rows.windows(2).all(|w| w[0] < w[1]) {
        return Ok(());
    }
    let mut seen: FxHashSet<u32> = FxHashSet::default();
    match rows.iter().find(|&&r| !seen.insert(r)) {
        Some(&row) => Err(Error::MalformedColumn(format!("row {} is listed twice", row))),
        None => Ok(()),
    }
}

/// Sparse column as parallel `rows`/`values` arrays (0-based, distinct rows).
#[derive(Debug, Clone, Copy)]
pub struct SparseColumn<'a> {
    len: usize,
    rows: &'a [u32],
    values: &'a [f64],
}

impl<'a> SparseColumn<'a> {
    pub fn new(len: usize, rows: &'a [u32], values: &'a [f64]) -> Result<Self> {
        if rows.len() != values.len() {
            return Err(Error::MalformedColumn(format!(
                "{} rows but {} values",
                rows.len(),
                values.len()
            )));
        }
        if let Some(&row) = rows.iter().find(|&&r| r as usize >= len) {
            return Err(Error::MalformedColumn(format!(
                "row {} outside column of length {}",
                row, len
            )));
        }
        check_distinct_rows(rows)?;
        Ok(Self { len, rows, values })
    }
}

impl ColumnAccess for SparseColumn<'_> {
    #[inline]
    fn node_count(&self) -> usize {
        self.len
    }

    fn value_at(&self, node: usize) -> f64 {
        self.rows
            .iter()
            .zip(self.values.iter())
            .filter(|&(&r, _)| r as usize == node)
            .map(|(_, &v)| v)
            .sum()
    }

    #[inline]
    fn stored_len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    fn stored(&self, k: usize) -> (usize, f64) {
        (self.rows[k] as usize, self.values[k])
    }

    #[inline]
    fn is_sparse(&self) -> bool {
        true
    }
}

/// Borrowed column of either storage kind.
#[derive(Debug, Clone, Copy)]
pub enum Column<'a> {
    Dense(DenseColumn<'a>),
    Sparse(SparseColumn<'a>),
}

impl ColumnAccess for Column<'_> {
    #[inline]
    fn node_count(&self) -> usize {
        match self {
            Column::Dense(c) => c.node_count(),
            Column::Sparse(c) => c.node_count(),
        }
    }

    #[inline]
    fn value_at(&self, node: usize) -> f64 {
        match self {
            Column::Dense(c) => c.value_at(node),
            Column::Sparse(c) => c.value_at(node),
        }
    }

    #[inline]
    fn stored_len(&self) -> usize {
        match self {
            Column::Dense(c) => c.stored_len(),
            Column::Sparse(c) => c.stored_len(),
        }
    }

    #[inline]
    fn stored(&self, k: usize) -> (usize, f64) {
        match self {
            Column::Dense(c) => c.stored(k),
            Column::Sparse(c) => c.stored(k),
        }
    }

    #[inline]
    fn is_sparse(&self) -> bool {
        matches!(self, Column::Sparse(_))
    }
}

/// Owned column, produced by coarsening and accepted back as input.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedColumn {
    Dense(Vec<f64>),
    Sparse {
        len: usize,
        rows: Vec<u32>,
        values: Vec<f64>,
    },
}

impl OwnedColumn {
    /// Builds a sparse column, checking that the arrays agree with `len`.
    pub fn sparse(len: usize, rows: Vec<u32>, values: Vec<f64>) -> Result<Self> {
        SparseColumn::new(len, &rows, &values)?;
        Ok(OwnedColumn::Sparse { len, rows, values })
    }

    pub fn len(&self) -> usize {
        self.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_dense(&self) -> Vec<f64> {
        match self {
            OwnedColumn::Dense(values) => values.clone(),
            OwnedColumn::Sparse { len, rows, values } => {
                let mut out = vec![0.0; *len];
                for (&r, &v) in rows.iter().zip(values.iter()) {
                    out[r as usize] += v;
                }
                out
            }
        }
    }

    pub fn as_column(&self) -> Column<'_> {
        match self {
            OwnedColumn::Dense(values) => Column::Dense(DenseColumn::new(values)),
            OwnedColumn::Sparse { len, rows, values } => Column::Sparse(SparseColumn {
                len: *len,
                rows,
                values,
            }),
        }
    }
}

impl ColumnAccess for OwnedColumn {
    fn node_count(&self) -> usize {
        match self {
            OwnedColumn::Dense(values) => values.len(),
            OwnedColumn::Sparse { len, .. } => *len,
        }
    }

    fn value_at(&self, node: usize) -> f64 {
        self.as_column().value_at(node)
    }

    fn stored_len(&self) -> usize {
        match self {
            OwnedColumn::Dense(values) => values.len(),
            OwnedColumn::Sparse { rows, .. } => rows.len(),
        }
    }

    fn stored(&self, k: usize) -> (usize, f64) {
        self.as_column().stored(k)
    }

    fn is_sparse(&self) -> bool {
        matches!(self, OwnedColumn::Sparse { .. })
    }
}

/// Column-compressed storage: several sparse columns sharing one pair of
/// `rows`/`values` arrays, column `j` spanning `col_offsets[j]..col_offsets[j + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    n_rows: usize,
    col_offsets: Vec<u32>,
    rows: Vec<u32>,
    values: Vec<f64>,
}

impl CscMatrix {
    pub fn new(n_rows: usize, col_offsets: Vec<u32>, rows: Vec<u32>, values: Vec<f64>) -> Result<Self> {
        if col_offsets.is_empty() || col_offsets[0] != 0 {
            return Err(Error::MalformedColumn(
                "column offsets must start at 0".to_string(),
            ));
        }
        if col_offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::MalformedColumn(
                "column offsets must be non-decreasing".to_string(),
            ));
        }
        let nnz = col_offsets[col_offsets.len() - 1] as usize;
        if nnz != rows.len() || nnz != values.len() {
            return Err(Error::MalformedColumn(format!(
                "offsets cover {} entries but {} rows and {} values were given",
                nnz,
                rows.len(),
                values.len()
            )));
        }
        if let Some(&row) = rows.iter().find(|&&r| r as usize >= n_rows) {
            return Err(Error::MalformedColumn(format!(
                "row {} outside matrix with {} rows",
                row, n_rows
            )));
        }
        for w in col_offsets.windows(2) {
            check_distinct_rows(&rows[w[0] as usize..w[1] as usize])?;
        }
        Ok(Self {
            n_rows,
            col_offsets,
            rows,
            values,
        })
    }

    /// Builds an `n_rows x n_cols` matrix from 0-based `(row, col, value)` triplets.
    ///
    /// Duplicates are summed, entries summing to zero are dropped and rows are
    /// sorted within each column.
    pub fn from_triplets(n_rows: usize, n_cols: usize, triplets: &[(u32, u32, f64)]) -> Result<Self> {
        let mut sorted: Vec<(u32, u32, f64)> = Vec::with_capacity(triplets.len());
        for &(r, c, v) in triplets {
            if r as usize >= n_rows || c as usize >= n_cols {
                return Err(Error::MalformedColumn(format!(
                    "entry ({}, {}) outside {}x{} matrix",
                    r, c, n_rows, n_cols
                )));
            }
            sorted.push((r, c, v));
        }
        sorted.sort_unstable_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut counts = vec![0u32; n_cols];
        let mut rows = Vec::with_capacity(sorted.len());
        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last: Option<(u32, u32)> = None;
        for (r, c, v) in sorted {
            if last == Some((r, c)) {
                if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
                continue;
            }
            rows.push(r);
            values.push(v);
            counts[c as usize] += 1;
            last = Some((r, c));
        }

        // Drop entries that summed to zero, keeping column counts in step.
        let mut keep_rows = Vec::with_capacity(rows.len());
        let mut keep_values = Vec::with_capacity(values.len());
        let mut col_offsets = vec![0u32; n_cols + 1];
        let mut k = 0usize;
        for c in 0..n_cols {
            let mut kept = 0u32;
            for _ in 0..counts[c] {
                if values[k] != 0.0 {
                    keep_rows.push(rows[k]);
                    keep_values.push(values[k]);
                    kept += 1;
                }
                k += 1;
            }
            col_offsets[c + 1] = col_offsets[c] + kept;
        }

        Ok(Self {
            n_rows,
            col_offsets,
            rows: keep_rows,
            values: keep_values,
        })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.col_offsets.len() - 1
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    fn col_range(&self, col: usize) -> std::ops::Range<usize> {
        self.col_offsets[col] as usize..self.col_offsets[col + 1] as usize
    }

    /// View of column `col`. Panics if `col >= n_cols()`.
    pub fn column(&self, col: usize) -> SparseColumn<'_> {
        let range = self.col_range(col);
        SparseColumn {
            len: self.n_rows,
            rows: &self.rows[range.clone()],
            values: &self.values[range],
        }
    }

    /// Copies out column `col` as an owned sparse column.
    pub fn column_owned(&self, col: usize) -> Result<OwnedColumn> {
        if col >= self.n_cols() {
            return Err(Error::MalformedColumn(format!(
                "column {} outside matrix with {} columns",
                col,
                self.n_cols()
            )));
        }
        let range = self.col_range(col);
        Ok(OwnedColumn::Sparse {
            len: self.n_rows,
            rows: self.rows[range.clone()].to_vec(),
            values: self.values[range].to_vec(),
        })
    }
}
