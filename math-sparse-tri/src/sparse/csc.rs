//! Compressed Sparse Column (CSC) matrix format
//!
//! CSC format stores:
//! - `values`: Non-zero entries in column-major order
//! - `row_indices`: Row index for each value
//! - `col_ptrs`: Index into values/row_indices where each column starts

use super::view::{CscView, SparseError, check_format};
use crate::traits::{ComplexField, LinearOperator};
use ndarray::{Array1, Array2};
use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Compressed Sparse Column (CSC) matrix format
///
/// Owned storage matching the layout produced by sparse factorizations.
/// Within each column, entries built by this type are sorted by row index.
#[derive(Debug, Clone)]
pub struct CscMatrix<T: ComplexField> {
    /// Number of rows
    pub n_rows: usize,
    /// Number of columns
    pub n_cols: usize,
    /// Column pointers: col_ptrs[j] is the start index in values/row_indices for column j
    /// col_ptrs[n_cols] = nnz (total number of non-zeros)
    pub col_ptrs: Vec<usize>,
    /// Row indices for each value
    pub row_indices: Vec<usize>,
    /// Non-zero values in column-major order
    pub values: Vec<T>,
}

impl<T: ComplexField> CscMatrix<T> {
    /// Create a new empty CSC matrix
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            col_ptrs: vec![0; n_cols + 1],
            row_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create an empty CSC matrix with pre-allocated capacity
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            col_ptrs: vec![0; n_cols + 1],
            row_indices: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Create a CSC matrix from raw components
    ///
    /// The arrays are taken as-is; only the storage format is checked
    /// (pointer shape, non-zero count, row bounds).
    pub fn from_raw_parts(
        n_rows: usize,
        n_cols: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, SparseError> {
        check_format(n_rows, n_cols, &col_ptrs, &row_indices, &values)?;

        Ok(Self {
            n_rows,
            n_cols,
            col_ptrs,
            row_indices,
            values,
        })
    }

    /// Create a CSC matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T::Real) -> Self {
        let n_rows = dense.nrows();
        let n_cols = dense.ncols();

        let mut values = Vec::new();
        let mut row_indices = Vec::new();
        let mut col_ptrs = vec![0usize; n_cols + 1];

        for j in 0..n_cols {
            for i in 0..n_rows {
                let val = dense[[i, j]];
                if val.norm() > threshold {
                    values.push(val);
                    row_indices.push(i);
                }
            }
            col_ptrs[j + 1] = values.len();
        }

        Self {
            n_rows,
            n_cols,
            col_ptrs,
            row_indices,
            values,
        }
    }

    /// Create a CSC matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed, and explicit
    /// zeros are kept so that a zero pivot stays in the structure.
    ///
    /// # Panics
    ///
    /// Panics if a triplet lies outside the `n_rows` x `n_cols` shape.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Self {
        // Sort by column, then by row
        triplets.sort_by_key(|&(row, col, _)| (col, row));

        let mut values: Vec<T> = Vec::with_capacity(triplets.len());
        let mut row_indices = Vec::with_capacity(triplets.len());
        let mut counts = vec![0usize; n_cols];
        let mut prev: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            assert!(
                row < n_rows && col < n_cols,
                "Triplet ({row}, {col}) outside {n_rows}x{n_cols} matrix"
            );

            if prev == Some((row, col)) {
                if let Some(last) = values.last_mut() {
                    *last += val;
                }
                continue;
            }

            values.push(val);
            row_indices.push(row);
            counts[col] += 1;
            prev = Some((row, col));
        }

        let mut col_ptrs = Vec::with_capacity(n_cols + 1);
        col_ptrs.push(0);
        let mut total = 0;
        for count in counts {
            total += count;
            col_ptrs.push(total);
        }

        Self {
            n_rows,
            n_cols,
            col_ptrs,
            row_indices,
            values,
        }
    }

    /// Create identity matrix in CSC format
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            col_ptrs: (0..=n).collect(),
            row_indices: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Create diagonal matrix from vector
    ///
    /// Zero entries are stored explicitly.
    pub fn from_diagonal(diag: &Array1<T>) -> Self {
        let n = diag.len();
        Self {
            n_rows: n,
            n_cols: n,
            col_ptrs: (0..=n).collect(),
            row_indices: (0..n).collect(),
            values: diag.to_vec(),
        }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Sparsity ratio (fraction of non-zero entries)
    pub fn sparsity(&self) -> f64 {
        let total = self.n_rows * self.n_cols;
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    pub fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    /// Get the range of indices in values/row_indices for a given column
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.col_ptrs[col]..self.col_ptrs[col + 1]
    }

    /// Get the (row, value) pairs for a column
    pub fn col_entries(&self, col: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.col_range(col);
        self.row_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Borrow the matrix as a read-only square view for triangular solves
    pub fn as_view(&self) -> Result<CscView<'_, T>, SparseError> {
        if !self.is_square() {
            return Err(SparseError::NotSquare {
                rows: self.n_rows,
                cols: self.n_cols,
            });
        }
        CscView::new(self.n_cols, &self.col_ptrs, &self.row_indices, &self.values)
    }

    /// Matrix-vector product: y = A * x
    pub fn matvec(&self, x: &Array1<T>) -> Array1<T> {
        assert_eq!(x.len(), self.n_cols, "Input vector size mismatch");

        let mut y = Array1::from_elem(self.n_rows, T::zero());

        for j in 0..self.n_cols {
            let xj = x[j];
            for (i, a_ij) in self.col_entries(j) {
                y[i] += a_ij * xj;
            }
        }

        y
    }

    /// Transpose matrix-vector product: y = A^T * x
    ///
    /// Each output entry is the dot product of one column with `x`. Uses parallel
    /// processing when the `rayon` feature is enabled and the matrix is large
    /// enough to benefit from parallelization.
    pub fn matvec_transpose(&self, x: &Array1<T>) -> Array1<T> {
        assert_eq!(x.len(), self.n_rows, "Input vector size mismatch");

        #[cfg(feature = "rayon")]
        {
            // Only parallelize if we have enough columns to benefit
            if self.n_cols >= 246 {
                return self.matvec_transpose_parallel(x);
            }
        }

        self.matvec_transpose_sequential(x)
    }

    #[inline]
    fn column_dot(&self, col: usize, x: &Array1<T>) -> T {
        self.col_entries(col)
            .fold(T::zero(), |acc, (i, a_ij)| acc + a_ij * x[i])
    }

    fn matvec_transpose_sequential(&self, x: &Array1<T>) -> Array1<T> {
        Array1::from_iter((0..self.n_cols).map(|j| self.column_dot(j, x)))
    }

    #[cfg(feature = "rayon")]
    fn matvec_transpose_parallel(&self, x: &Array1<T>) -> Array1<T> {
        let results: Vec<T> = (0..self.n_cols)
            .into_par_iter()
            .map(|j| self.column_dot(j, x))
            .collect();

        Array1::from_vec(results)
    }

    /// Get element at (i, j), returns 0 if not stored
    pub fn get(&self, i: usize, j: usize) -> T {
        self.col_entries(j)
            .find(|&(row, _)| row == i)
            .map_or_else(T::zero, |(_, val)| val)
    }

    /// Extract diagonal elements
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.n_rows.min(self.n_cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.n_rows, self.n_cols), T::zero());

        for j in 0..self.n_cols {
            for (i, val) in self.col_entries(j) {
                dense[[i, j]] = val;
            }
        }

        dense
    }
}

impl<T: ComplexField> LinearOperator<T> for CscMatrix<T> {
    fn num_rows(&self) -> usize {
        self.n_rows
    }

    fn num_cols(&self) -> usize {
        self.n_cols
    }

    fn apply(&self, x: &Array1<T>) -> Array1<T> {
        self.matvec(x)
    }

    fn apply_transpose(&self, x: &Array1<T>) -> Array1<T> {
        self.matvec_transpose(x)
    }
}

/// Builder for constructing CSC matrices column by column
pub struct CscBuilder<T: ComplexField> {
    n_rows: usize,
    n_cols: usize,
    values: Vec<T>,
    row_indices: Vec<usize>,
    col_ptrs: Vec<usize>,
    current_col: usize,
}

impl<T: ComplexField> CscBuilder<T> {
    /// Create a new CSC builder
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Create a new CSC builder with estimated non-zeros
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        let mut col_ptrs = Vec::with_capacity(n_cols + 1);
        col_ptrs.push(0);
        Self {
            n_rows,
            n_cols,
            values: Vec::with_capacity(nnz_estimate),
            row_indices: Vec::with_capacity(nnz_estimate),
            col_ptrs,
            current_col: 0,
        }
    }

    /// Add entries for the current column (must be added in row order)
    ///
    /// Zeros are stored, since a factor's structural pivot may be numerically zero.
    pub fn add_col_entries(&mut self, entries: impl IntoIterator<Item = (usize, T)>) {
        for (row, val) in entries {
            self.values.push(val);
            self.row_indices.push(row);
        }
        self.col_ptrs.push(self.values.len());
        self.current_col += 1;
    }

    /// Finish building and return the CSC matrix
    pub fn finish(mut self) -> Result<CscMatrix<T>, SparseError> {
        // Fill remaining columns if not all columns were added
        while self.current_col < self.n_cols {
            self.col_ptrs.push(self.values.len());
            self.current_col += 1;
        }

        CscMatrix::from_raw_parts(
            self.n_rows,
            self.n_cols,
            self.col_ptrs,
            self.row_indices,
            self.values,
        )
    }
}
