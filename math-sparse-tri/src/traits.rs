//! Core traits for sparse triangular operations
//!
//! This module defines the abstractions shared by the storage and solver modules:
//! - [`ComplexField`]: Trait for scalar types (complex and real numbers)
//! - [`LinearOperator`]: Trait for matrix-like objects that can perform matrix-vector products

use ndarray::Array1;
use num_complex::{Complex32, Complex64};
use num_traits::{Float, FromPrimitive, NumAssign, One, ToPrimitive, Zero};
use std::fmt::Debug;
use std::ops::Neg;

/// Trait for scalar types that can be stored in a sparse factor.
///
/// Only the pivot magnitude is needed beyond ordinary field arithmetic.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (the common case for factorization outputs)
/// - `f32` (for memory-constrained applications)
/// - `Complex64`
/// - `Complex32`
pub trait ComplexField:
    NumAssign + Clone + Copy + Send + Sync + Debug + Zero + One + Neg<Output = Self> + 'static
{
    /// The real number type underlying this field
    type Real: Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + 'static;

    /// Magnitude |z|
    ///
    /// Implementations avoid squaring so that tiny but nonzero pivots keep a
    /// nonzero magnitude.
    fn norm(&self) -> Self::Real;
}

impl ComplexField for Complex64 {
    type Real = f64;

    #[inline]
    fn norm(&self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl ComplexField for Complex32 {
    type Real = f32;

    #[inline]
    fn norm(&self) -> f32 {
        self.re.hypot(self.im)
    }
}

impl ComplexField for f64 {
    type Real = f64;

    #[inline]
    fn norm(&self) -> f64 {
        self.abs()
    }
}

impl ComplexField for f32 {
    type Real = f32;

    #[inline]
    fn norm(&self) -> f32 {
        self.abs()
    }
}

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// Used to check triangular solves by multiplying the factor back against the
/// computed solution.
pub trait LinearOperator<T: ComplexField>: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<T>) -> Array1<T>;

    /// Apply the transpose: y = A^T * x
    fn apply_transpose(&self, x: &Array1<T>) -> Array1<T>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}
