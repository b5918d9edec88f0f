//! Sparse matrix structures (CSC format)
//!
//! This module provides the Compressed Sparse Column format in which
//! factorizations deliver their triangular factors: an owned [`CscMatrix`]
//! and the borrowed [`CscView`] consumed by the triangular solver.

mod csc;
mod view;

pub use csc::{CscBuilder, CscMatrix};
pub use view::{CscView, SparseError};
