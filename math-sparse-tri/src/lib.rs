//! Sparse triangular kernels for direct solvers
//!
//! This crate provides the back-substitution step shared by sparse LU,
//! Cholesky and QR factorizations: solving `Uᵗx = b` in place, where `U` is an
//! upper-triangular factor stored in Compressed Sparse Column form.
//!
//! # Features
//!
//! - **Sparse Storage**: CSC matrices, either owned ([`CscMatrix`]) or borrowed ([`CscView`])
//! - **Triangular Solve**: in-place `Uᵗx = b` with a singular-pivot tolerance
//! - **Generic Scalar Types**: Works with f64, f32, Complex64, Complex32
//!
//! # Example
//!
//! ```
//! use math_sparse_tri::{CscMatrix, utsolve_singular};
//!
//! // U = [[2, 1], [0, 4]], columns sorted with the diagonal last
//! let u = CscMatrix::from_triplets(2, 2, vec![(0, 0, 2.0), (0, 1, 1.0), (1, 1, 4.0)]);
//! let view = u.as_view().unwrap();
//!
//! let mut x = vec![2.0, 9.0];
//! assert!(utsolve_singular(Some(&view), Some(&mut x[..]), 1e-12));
//! assert_eq!(x, vec![1.0, 2.0]);
//! ```

pub mod sparse;
pub mod traits;
pub mod triangular;

// Re-export main types
pub use sparse::{CscBuilder, CscMatrix, CscView, SparseError};
pub use traits::{ComplexField, LinearOperator};

// Re-export triangular solvers
pub use triangular::{
    TriangularSolveError, UtSolveConfig, UtSolveStats, utsolve, utsolve_array, utsolve_singular,
    utsolve_with_config,
};
