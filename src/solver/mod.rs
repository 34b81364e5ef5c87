//! Solver interface for the reduction.
//!
//! This module provides:
//! - The external solver call contract and its raw result types
//! - Translation to and from the ECOS-style argument layout

pub mod backend;
pub mod ecos;

pub use backend::{
    ConicBackend, OptionValue, RawInfo, RawResult, RawTiming, SolverCache, SolverCones,
    SolverOptions,
};
pub use ecos::{
    apply, dims_to_solver_cones, invert, solve, solve_via_data, status_from_exit_flag,
    InverseData, SolverData,
};
