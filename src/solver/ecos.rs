//! Translation between canonical problems and the ECOS-style solver layout.
//!
//! [`apply`] slices the stacked affine map into the separate objective,
//! equality and inequality pieces the solver takes, [`solve_via_data`] makes
//! the one external call, and [`invert`] maps the raw result back to a
//! solver-agnostic [`SolveResult`].

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use crate::cones::{group_constraints, ConeDims};
use crate::error::{ReductionError, Result};
use crate::problem::{CanonicalProblem, VarId};
use crate::solution::{
    failure_solution, SolveAttributes, SolveResult, Solution, SolverStatus, DUAL_VAR_ID,
};
use crate::solver::backend::{ConicBackend, RawResult, SolverCache, SolverCones, SolverOptions};
use crate::sparse::csc_to_dense;

/// Arguments for the solver's entry point, in its required layout.
///
/// The solver takes `min c.x  s.t.  a x = b,  h - g x in K`. Matrices are
/// dense, row order matches the canonical constraint order.
#[derive(Debug, Clone)]
pub struct SolverData {
    /// Objective vector (constant entry stripped).
    pub c: Vec<f64>,
    /// Inequality/cone coefficient matrix.
    pub g: DMatrix<f64>,
    /// Inequality/cone right-hand side.
    pub h: Vec<f64>,
    /// Cone dimensions of the rows of `g`.
    pub dims: ConeDims,
    /// Equality coefficient matrix.
    pub a: DMatrix<f64>,
    /// Equality right-hand side.
    pub b: Vec<f64>,
}

/// Metadata recorded at translation time, sufficient to invert a later raw
/// result without re-reading the problem. Read-only after creation.
#[derive(Debug, Clone)]
pub struct InverseData {
    /// Identifier of the decision-variable vector.
    pub var_id: VarId,
    /// Constant objective offset to re-add to the primal objective.
    pub offset: f64,
    /// Cone dimensions used for the solve.
    pub dims: ConeDims,
}

/// Map a solver exit flag to a universal status.
///
/// Solver exit flags:
/// - 0: problem solved to optimality
/// - 1: certificate of primal infeasibility
/// - 2: certificate of dual infeasibility
/// - 10/11/12: the same three at reduced accuracy (offset flags)
/// - -1: maximum number of iterations reached
/// - -2: search direction unreliable
/// - -3: s or z got outside the cone
/// - -4: interrupted by a signal
/// - -7: unknown problem in solver
///
/// Every negative flag collapses to [`SolverStatus::SolverError`]; the raw
/// flag survives in [`SolveAttributes::exit_flag`]. Flags outside this table
/// are a contract violation.
pub fn status_from_exit_flag(exit_flag: i32) -> Result<SolverStatus> {
    let status = match exit_flag {
        0 => SolverStatus::Optimal,
        1 => SolverStatus::Infeasible,
        2 => SolverStatus::Unbounded,
        10 => SolverStatus::OptimalInaccurate,
        11 => SolverStatus::InfeasibleInaccurate,
        12 => SolverStatus::UnboundedInaccurate,
        -1 | -2 | -3 | -4 | -7 => SolverStatus::SolverError,
        other => return Err(ReductionError::UnknownExitFlag(other)),
    };
    Ok(status)
}

/// Format cone dimensions into the solver's cone-size schema.
pub fn dims_to_solver_cones(dims: &ConeDims) -> SolverCones {
    SolverCones {
        l: dims.nonneg,
        q: dims.soc.clone(),
        e: dims.exp,
    }
}

/// Translate a canonical problem into solver arguments plus the metadata
/// needed to invert the solution later.
///
/// The problem's affine map represents each constraint block as
/// `A_ext [x; 1] in K`; the solver wants `b - a x` and `h - g x` in the
/// cones, so the coefficient columns are negated and the constant column is
/// taken as-is.
pub fn apply(problem: &CanonicalProblem) -> Result<(SolverData, InverseData)> {
    let groups = group_constraints(&problem.constraints);
    let len_eq = groups.len_eq();
    let dims = ConeDims::from_groups(&groups)?;

    if problem.c_ext.is_empty() {
        return Err(ReductionError::ShapeMismatch {
            expected: "objective vector with a trailing constant".into(),
            got: "empty objective vector".into(),
        });
    }
    let n = problem.num_vars();
    let m = problem.a_ext.nrows();
    if m != len_eq + dims.total() || problem.a_ext.ncols() != n + 1 {
        return Err(ReductionError::ShapeMismatch {
            expected: format!("{} x {} affine map", len_eq + dims.total(), n + 1),
            got: format!("{} x {}", m, problem.a_ext.ncols()),
        });
    }

    let c = problem.c_ext[..n].to_vec();
    let offset = problem.c_ext[n];

    let dense = csc_to_dense(&problem.a_ext);
    let a = DMatrix::from_fn(len_eq, n, |i, j| -dense[(i, j)]);
    let b: Vec<f64> = (0..len_eq).map(|i| dense[(i, n)]).collect();
    let g = DMatrix::from_fn(m - len_eq, n, |i, j| -dense[(len_eq + i, j)]);
    let h: Vec<f64> = (len_eq..m).map(|i| dense[(i, n)]).collect();

    let data = SolverData {
        c,
        g,
        h,
        dims: dims.clone(),
        a,
        b,
    };
    let inv_data = InverseData {
        var_id: problem.var_id,
        offset,
        dims,
    };
    Ok((data, inv_data))
}

/// Invoke the external solver with the translated arguments.
///
/// This is the only place the external call happens. The raw result is
/// returned unmodified; backend failures propagate unchanged with no retry.
pub fn solve_via_data(
    backend: &mut dyn ConicBackend,
    data: &SolverData,
    verbose: bool,
    opts: &SolverOptions,
    cache: Option<&mut SolverCache>,
) -> Result<RawResult> {
    let cones = dims_to_solver_cones(&data.dims);
    backend.solve(
        &data.c, &data.g, &data.h, &cones, &data.a, &data.b, verbose, opts, cache,
    )
}

/// Map a raw solver result back to a solver-agnostic outcome.
///
/// Timing and iteration attributes are extracted regardless of status. When
/// the status carries a solution, the objective offset is re-added and the
/// primal/dual vectors are keyed by the recorded identifiers, equality duals
/// ahead of inequality/cone duals. Otherwise only the status survives.
pub fn invert(raw: &RawResult, inv_data: &InverseData) -> Result<SolveResult> {
    let status = status_from_exit_flag(raw.exit_flag)?;

    let attr = SolveAttributes {
        solve_time: raw.info.timing.tsolve,
        setup_time: raw.info.timing.tsetup,
        iterations: raw.info.iter,
        exit_flag: raw.exit_flag,
    };

    if status.is_solution_present() {
        let opt_val = raw.info.pcost + inv_data.offset;

        let mut primal_vars = HashMap::new();
        primal_vars.insert(inv_data.var_id, DVector::from_column_slice(&raw.x));

        let mut duals = Vec::with_capacity(raw.y.len() + raw.z.len());
        duals.extend_from_slice(&raw.y);
        duals.extend_from_slice(&raw.z);
        let mut dual_vars = HashMap::new();
        dual_vars.insert(DUAL_VAR_ID, DVector::from_vec(duals));

        Ok(SolveResult::Solution(Solution {
            status,
            opt_val,
            primal_vars,
            dual_vars,
            attr,
        }))
    } else {
        Ok(failure_solution(status))
    }
}

/// Translate, solve and invert in one call.
pub fn solve(
    problem: &CanonicalProblem,
    backend: &mut dyn ConicBackend,
    verbose: bool,
    opts: &SolverOptions,
    cache: Option<&mut SolverCache>,
) -> Result<SolveResult> {
    let (data, inv_data) = apply(problem)?;
    let raw = solve_via_data(backend, &data, verbose, opts, cache)?;
    invert(&raw, &inv_data)
}
