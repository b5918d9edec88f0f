//! Transpose upper-triangular solve: `Uᵗx = b`
//!
//! `U` is an upper-triangular factor in CSC form whose columns are sorted by
//! row with the diagonal stored last. Reading the columns of `U` as the rows of
//! `Uᵗ` turns the solve into a forward substitution: column `j` only references
//! unknowns `x[i]` with `i < j`, which earlier iterations have already resolved.
//!
//! Pivots whose magnitude does not exceed the tolerance are replaced by one,
//! leaving the accumulated residual in `x[j]` instead of producing `inf`/`NaN`.

use crate::sparse::{CscView, SparseError};
use crate::traits::ComplexField;
use ndarray::Array1;
use num_traits::{Float, ToPrimitive, Zero};
use thiserror::Error;

/// Errors reported by [`utsolve_with_config`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriangularSolveError {
    #[error("vector length mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("right-hand side is not contiguous in memory")]
    NonContiguous,
    #[error("invalid triangular factor: {0}")]
    Structure(#[from] SparseError),
}

/// Transpose upper-triangular solve configuration
#[derive(Debug, Clone)]
pub struct UtSolveConfig<R> {
    /// Pivots with magnitude <= tolerance are treated as singular
    pub tolerance: R,
    /// Verify that each column ends with its diagonal entry before solving.
    /// When false the factor is trusted, in debug builds too.
    pub check_diagonal: bool,
    /// Emit a warning listing the substituted pivots
    pub log_singular: bool,
}

impl<R: Float> Default for UtSolveConfig<R> {
    fn default() -> Self {
        Self {
            tolerance: R::zero(),
            check_diagonal: cfg!(debug_assertions),
            log_singular: false,
        }
    }
}

impl<R: Float> UtSolveConfig<R> {
    /// Default configuration with the given singular-pivot tolerance
    pub fn with_tolerance(tolerance: R) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}

/// Diagnostics from a transpose upper-triangular solve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtSolveStats {
    /// Number of columns swept
    pub columns: usize,
    /// Columns whose pivot did not exceed the tolerance, in increasing order
    pub singular_pivots: Vec<usize>,
}

impl UtSolveStats {
    pub fn num_singular(&self) -> usize {
        self.singular_pivots.len()
    }

    /// True when every unknown was scaled by its real pivot
    pub fn is_exact(&self) -> bool {
        self.singular_pivots.is_empty()
    }
}

/// Column sweep shared by all entry points.
///
/// The caller guarantees `x.len() == u.n()` and that no column is empty.
#[inline]
fn sweep<T, F>(u: &CscView<'_, T>, x: &mut [T], tolerance: T::Real, mut on_singular: F)
where
    T: ComplexField,
    F: FnMut(usize),
{
    let col_ptrs = u.col_ptrs();
    let row_indices = u.row_indices();
    let values = u.values();

    for j in 0..u.n() {
        let diag = col_ptrs[j + 1] - 1;

        for p in col_ptrs[j]..diag {
            x[j] = x[j] - values[p] * x[row_indices[p]];
        }

        let pivot = values[diag];
        if pivot.norm() > tolerance {
            x[j] /= pivot;
        } else {
            // Identity scale: x[j] keeps the residual
            on_singular(j);
        }
    }
}

/// Solve `Uᵗx = b` in place, substituting a unit scale for small pivots.
///
/// On entry `x` holds `b`; on return it holds the solution. Any column whose
/// pivot magnitude is `<= tolerance` leaves `x[j]` as the accumulated residual,
/// so downstream code must treat that component as approximate.
///
/// Returns `false` without touching `x` when either argument is absent, when
/// `x.len()` differs from the matrix dimension, or when a column is empty.
/// Debug builds also assert that every column ends with its diagonal.
/// Singular pivots are not a failure: the return value is `true` however many
/// were substituted.
///
/// No allocation takes place, and the factor may be shared between concurrent
/// solves on distinct vectors.
pub fn utsolve_singular<T: ComplexField>(
    u: Option<&CscView<'_, T>>,
    x: Option<&mut [T]>,
    tolerance: T::Real,
) -> bool {
    let (Some(u), Some(x)) = (u, x) else {
        return false;
    };
    if x.len() != u.n() || u.first_empty_column().is_some() {
        return false;
    }
    debug_assert!(
        u.check_diagonal_last().is_ok(),
        "triangular factor does not store each diagonal last"
    );

    sweep(u, x, tolerance, |_| {});
    true
}

/// Solve `Uᵗx = b` in place with zero tolerance.
///
/// Divides by every pivot except those that are exactly zero.
pub fn utsolve<T: ComplexField>(u: Option<&CscView<'_, T>>, x: Option<&mut [T]>) -> bool {
    utsolve_singular(u, x, T::Real::zero())
}

/// Solve `Uᵗx = b` in place and report which pivots were substituted.
///
/// Numerically identical to [`utsolve_singular`] with `config.tolerance`.
/// Invalid input is reported as an error before `x` is modified.
pub fn utsolve_with_config<T: ComplexField>(
    u: &CscView<'_, T>,
    x: &mut [T],
    config: &UtSolveConfig<T::Real>,
) -> Result<UtSolveStats, TriangularSolveError> {
    let n = u.n();
    if x.len() != n {
        return Err(TriangularSolveError::DimensionMismatch {
            expected: n,
            got: x.len(),
        });
    }

    if config.check_diagonal {
        u.check_diagonal_last()?;
    } else if let Some(col) = u.first_empty_column() {
        return Err(SparseError::EmptyColumn { col }.into());
    }

    let mut singular_pivots = Vec::new();
    sweep(u, x, config.tolerance, |j| singular_pivots.push(j));

    log::debug!(
        "utsolve: n = {}, nnz = {}, singular pivots = {}",
        n,
        u.nnz(),
        singular_pivots.len()
    );

    if config.log_singular && !singular_pivots.is_empty() {
        log::warn!(
            "utsolve: {} of {} pivots at or below tolerance {:.3e}, columns {:?}",
            singular_pivots.len(),
            n,
            config.tolerance.to_f64().unwrap_or(f64::NAN),
            singular_pivots
        );
    }

    Ok(UtSolveStats {
        columns: n,
        singular_pivots,
    })
}

/// [`utsolve_with_config`] for an `ndarray` right-hand side
pub fn utsolve_array<T: ComplexField>(
    u: &CscView<'_, T>,
    x: &mut Array1<T>,
    config: &UtSolveConfig<T::Real>,
) -> Result<UtSolveStats, TriangularSolveError> {
    let x = x
        .as_slice_mut()
        .ok_or(TriangularSolveError::NonContiguous)?;
    utsolve_with_config(u, x, config)
}
