//! Sparse triangular solvers
//!
//! This module provides in-place substitution against factors stored in CSC form:
//! - [`utsolve_singular`]: solve `Uᵗx = b` with a singular-pivot tolerance
//! - [`utsolve`]: the same solve with zero tolerance
//! - [`utsolve_with_config`]: the same solve reporting which pivots were substituted

mod utsolve;

pub use utsolve::{
    TriangularSolveError, UtSolveConfig, UtSolveStats, utsolve, utsolve_array, utsolve_singular,
    utsolve_with_config,
};
