//! Solver-agnostic solution types.
//!
//! [`SolveResult`] is what the reduction hands back to the caller: either a
//! [`Solution`] with full numeric payload or a [`Failure`] carrying only a
//! status. Infeasibility and unboundedness are data, not errors.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::problem::VarId;

/// Universal solution status.
///
/// The inaccurate variants mean the solver stopped short of certified
/// precision but still returned usable primal/dual values; callers decide
/// their own tolerance. All numerical-trouble exit conditions (iteration
/// limit, unreliable search direction, cone violation, interrupt, unknown
/// fatal) collapse into `SolverError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is primal infeasible.
    Infeasible,
    /// Problem is dual infeasible, i.e. unbounded.
    Unbounded,
    /// Optimal to reduced accuracy.
    OptimalInaccurate,
    /// Infeasibility certificate at reduced accuracy.
    InfeasibleInaccurate,
    /// Unboundedness certificate at reduced accuracy.
    UnboundedInaccurate,
    /// Solver gave up; no usable result.
    SolverError,
}

impl SolverStatus {
    /// Whether a numeric solution accompanies this status.
    pub fn is_solution_present(&self) -> bool {
        matches!(
            self,
            SolverStatus::Optimal | SolverStatus::OptimalInaccurate
        )
    }

    /// Whether this is a reduced-accuracy variant.
    pub fn is_inaccurate(&self) -> bool {
        matches!(
            self,
            SolverStatus::OptimalInaccurate
                | SolverStatus::InfeasibleInaccurate
                | SolverStatus::UnboundedInaccurate
        )
    }
}

/// Key for a block of dual variables in a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DualVarId(pub u64);

/// The fixed key under which the concatenated constraint duals are stored.
pub const DUAL_VAR_ID: DualVarId = DualVarId(0);

/// Timing and iteration attributes extracted from the raw solver result.
///
/// `exit_flag` preserves the solver's raw code so callers wanting finer
/// diagnostics than [`SolverStatus::SolverError`] can still get them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveAttributes {
    /// Solve phase time in seconds.
    pub solve_time: f64,
    /// Setup phase time in seconds.
    pub setup_time: f64,
    /// Number of solver iterations.
    pub iterations: u32,
    /// Raw solver exit flag.
    pub exit_flag: i32,
}

/// A populated solution. Constructed once by the inversion step, immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status; always from the solution-present subset.
    pub status: SolverStatus,
    /// Optimal objective value, constant offset re-added.
    pub opt_val: f64,
    /// Primal values keyed by the original variable identifier.
    pub primal_vars: HashMap<VarId, DVector<f64>>,
    /// Dual values under [`DUAL_VAR_ID`]: equality duals first, then
    /// inequality/cone duals.
    pub dual_vars: HashMap<DualVarId, DVector<f64>>,
    /// Timing and iteration attributes.
    pub attr: SolveAttributes,
}

/// A failed solve: status only, no numeric payload.
#[derive(Debug, Clone, Copy)]
pub struct Failure {
    /// Status from the non-solution-present subset.
    pub status: SolverStatus,
}

/// Outcome of a solve: a populated solution or a status-only failure.
#[derive(Debug, Clone)]
pub enum SolveResult {
    /// The solver produced usable primal/dual values.
    Solution(Solution),
    /// No usable numeric result.
    Failure(Failure),
}

impl SolveResult {
    /// The status of either outcome.
    pub fn status(&self) -> SolverStatus {
        match self {
            SolveResult::Solution(s) => s.status,
            SolveResult::Failure(f) => f.status,
        }
    }

    /// The populated solution, if present.
    pub fn as_solution(&self) -> Option<&Solution> {
        match self {
            SolveResult::Solution(s) => Some(s),
            SolveResult::Failure(_) => None,
        }
    }

    /// Whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, SolveResult::Failure(_))
    }
}

/// Build a status-only failure outcome.
pub fn failure_solution(status: SolverStatus) -> SolveResult {
    SolveResult::Failure(Failure { status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_present_subset() {
        assert!(SolverStatus::Optimal.is_solution_present());
        assert!(SolverStatus::OptimalInaccurate.is_solution_present());
        assert!(!SolverStatus::Infeasible.is_solution_present());
        assert!(!SolverStatus::Unbounded.is_solution_present());
        assert!(!SolverStatus::InfeasibleInaccurate.is_solution_present());
        assert!(!SolverStatus::SolverError.is_solution_present());
    }

    #[test]
    fn test_inaccurate_flag() {
        assert!(SolverStatus::UnboundedInaccurate.is_inaccurate());
        assert!(!SolverStatus::Optimal.is_inaccurate());
        assert!(!SolverStatus::SolverError.is_inaccurate());
    }

    #[test]
    fn test_failure_solution() {
        let result = failure_solution(SolverStatus::Infeasible);
        assert!(result.is_failure());
        assert_eq!(result.status(), SolverStatus::Infeasible);
        assert!(result.as_solution().is_none());
    }
}
