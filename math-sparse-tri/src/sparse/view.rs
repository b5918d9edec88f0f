//! Borrowed, read-only view over a Compressed Sparse Column (CSC) matrix
//!
//! A [`CscView`] is what factorization code hands to the triangular solver:
//! three slices plus the dimension. Construction checks the storage format
//! once so that every later traversal stays in bounds.

use crate::traits::ComplexField;
use std::ops::Range;
use thiserror::Error;

/// Errors describing a malformed compressed sparse column structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    #[error("column pointer array must have {expected} entries, got {got}")]
    ColumnPointerLength { expected: usize, got: usize },
    #[error("column pointers must start at 0, got {0}")]
    ColumnPointerStart(usize),
    #[error("column pointers decrease at column {col}")]
    DecreasingColumnPointers { col: usize },
    #[error(
        "non-zero count mismatch: col_ptrs ends at {col_ptrs}, \
         {row_indices} row indices, {values} values"
    )]
    NnzMismatch {
        col_ptrs: usize,
        row_indices: usize,
        values: usize,
    },
    #[error("row index {row} at position {index} is out of bounds for dimension {n}")]
    RowIndexOutOfBounds { index: usize, row: usize, n: usize },
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("column {col} has no stored entries")]
    EmptyColumn { col: usize },
    #[error("last entry of column {col} is in row {row}, expected the diagonal")]
    DiagonalNotLast { col: usize, row: usize },
}

/// Check the CSC storage format for an `n_rows` x `n_cols` matrix.
///
/// Verifies pointer length and monotonicity, the non-zero count of the three
/// arrays, and row-index bounds. Ordering within a column is not checked.
pub(crate) fn check_format<T>(
    n_rows: usize,
    n_cols: usize,
    col_ptrs: &[usize],
    row_indices: &[usize],
    values: &[T],
) -> Result<(), SparseError> {
    if col_ptrs.len() != n_cols + 1 {
        return Err(SparseError::ColumnPointerLength {
            expected: n_cols + 1,
            got: col_ptrs.len(),
        });
    }
    if col_ptrs[0] != 0 {
        return Err(SparseError::ColumnPointerStart(col_ptrs[0]));
    }
    if let Some(col) = col_ptrs.windows(2).position(|w| w[1] < w[0]) {
        return Err(SparseError::DecreasingColumnPointers { col });
    }

    let nnz = col_ptrs[n_cols];
    if nnz != row_indices.len() || nnz != values.len() {
        return Err(SparseError::NnzMismatch {
            col_ptrs: nnz,
            row_indices: row_indices.len(),
            values: values.len(),
        });
    }

    if let Some(index) = row_indices.iter().position(|&row| row >= n_rows) {
        return Err(SparseError::RowIndexOutOfBounds {
            index,
            row: row_indices[index],
            n: n_rows,
        });
    }

    Ok(())
}

/// Read-only view of a square CSC matrix
///
/// For each column `j`, `row_indices[col_ptrs[j]..col_ptrs[j + 1]]` and the
/// matching `values` slice hold that column's stored entries. Triangular
/// factors additionally keep each column sorted by row with the diagonal last;
/// that property belongs to the producer and is only checked on request via
/// [`CscView::check_diagonal_last`].
#[derive(Debug)]
pub struct CscView<'a, T> {
    n: usize,
    col_ptrs: &'a [usize],
    row_indices: &'a [usize],
    values: &'a [T],
}

impl<T> Clone for CscView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CscView<'_, T> {}

impl<'a, T: ComplexField> CscView<'a, T> {
    /// Create a view over raw CSC arrays of an `n` x `n` matrix
    pub fn new(
        n: usize,
        col_ptrs: &'a [usize],
        row_indices: &'a [usize],
        values: &'a [T],
    ) -> Result<Self, SparseError> {
        check_format(n, n, col_ptrs, row_indices, values)?;

        Ok(Self {
            n,
            col_ptrs,
            row_indices,
            values,
        })
    }

    /// Matrix dimension
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of stored entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.col_ptrs[self.n]
    }

    #[inline]
    pub fn col_ptrs(&self) -> &'a [usize] {
        self.col_ptrs
    }

    #[inline]
    pub fn row_indices(&self) -> &'a [usize] {
        self.row_indices
    }

    #[inline]
    pub fn values(&self) -> &'a [T] {
        self.values
    }

    /// Get the range of indices in values/row_indices for a given column
    #[inline]
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.col_ptrs[col]..self.col_ptrs[col + 1]
    }

    /// Get the (row, value) pairs for a column, in storage order
    pub fn col_entries(&self, col: usize) -> impl Iterator<Item = (usize, T)> + 'a {
        let range = self.col_range(col);
        self.row_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Last stored entry of a column as `(row, value)`
    ///
    /// In a triangular factor this is the pivot. Returns `None` for an empty column.
    #[inline]
    pub fn pivot(&self, col: usize) -> Option<(usize, T)> {
        let range = self.col_range(col);
        if range.is_empty() {
            return None;
        }
        let last = range.end - 1;
        Some((self.row_indices[last], self.values[last]))
    }

    /// First column with no stored entries, if any
    pub fn first_empty_column(&self) -> Option<usize> {
        self.col_ptrs.windows(2).position(|w| w[0] == w[1])
    }

    /// Verify that every column is non-empty and ends with its diagonal entry
    pub fn check_diagonal_last(&self) -> Result<(), SparseError> {
        for col in 0..self.n {
            match self.pivot(col) {
                None => return Err(SparseError::EmptyColumn { col }),
                Some((row, _)) if row != col => {
                    return Err(SparseError::DiagonalNotLast { col, row });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
