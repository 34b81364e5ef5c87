//! # ecos-reduction
//!
//! A solver-adapter reduction between canonicalized conic problems and an
//! ECOS-style numerical solver.
//!
//! The reduction takes a [`problem::CanonicalProblem`] — a linear objective
//! and one stacked affine map over `[x; 1]`, partitioned into cone blocks —
//! and produces the exact argument layout the solver expects: a split
//! objective vector, separate equality and inequality (matrix, vector)
//! pairs with the solver's sign conventions, and a cone-size schema. After
//! the solve it maps the raw numeric result and integer exit flag back into
//! a solver-agnostic [`solution::SolveResult`].
//!
//! ## Pipeline
//!
//! ```ignore
//! use ecos_reduction::prelude::*;
//!
//! let (data, inv_data) = apply(&problem)?;
//! let raw = solve_via_data(&mut backend, &data, false, &SolverOptions::new(), None)?;
//! let result = invert(&raw, &inv_data)?;
//! ```
//!
//! ## Contracts
//!
//! - Constraint rows follow a fixed order: equalities, nonnegative orthant,
//!   second-order cones, exponential cones, with exponential triples
//!   permuted by [`cones::EXP_CONE_ORDER`]. The upstream canonicalizer
//!   stacks the affine map in this order; [`solver::apply`] only slices it.
//! - The numerical solver is a black box behind [`solver::ConicBackend`];
//!   this crate implements no optimization algorithm and performs no
//!   factorization.
//! - Infeasibility, unboundedness and numerical trouble are statuses, not
//!   errors. Errors ([`error::ReductionError`]) mean a broken contract or a
//!   failed external call.

pub mod cones;
pub mod error;
pub mod problem;
pub mod solution;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use ecos_reduction::prelude::*;
/// ```
pub mod prelude {
    // Cones
    pub use crate::cones::{
        group_constraints, solver_row_order, ConeConstraint, ConeDims, ConstraintGroups,
        EXP_CONE_ORDER,
    };

    // Problem
    pub use crate::problem::{CanonicalProblem, VarId};

    // Solution
    pub use crate::solution::{
        failure_solution, Failure, SolveAttributes, SolveResult, Solution, SolverStatus,
        DUAL_VAR_ID,
    };

    // Solver
    pub use crate::solver::{
        apply, dims_to_solver_cones, invert, solve, solve_via_data, status_from_exit_flag,
        ConicBackend, InverseData, OptionValue, RawInfo, RawResult, RawTiming, SolverCache,
        SolverCones, SolverData, SolverOptions,
    };

    // Errors
    pub use crate::error::{ReductionError, Result};
}

// Re-export main types at crate root
pub use error::{ReductionError, Result};
pub use problem::CanonicalProblem;
pub use solution::{SolveResult, Solution, SolverStatus};
