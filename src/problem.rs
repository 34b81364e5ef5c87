//! Canonical problem representation consumed by the reduction.
//!
//! A canonical problem is the output of the canonicalization pipeline:
//! a linear objective with a trailing constant entry and a single stacked
//! affine map whose rows follow the solver's required order (see
//! [`crate::cones::solver_row_order`]).

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra_sparse::CscMatrix;

use crate::cones::{group_constraints, ConeConstraint, ConeDims};
use crate::error::{ReductionError, Result};

/// Unique identifier for a decision-variable vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(u64);

impl VarId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        VarId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for VarId {
    fn default() -> Self {
        Self::new()
    }
}

/// A conic problem in canonical form.
///
/// The objective is `c_ext[..n] . x + c_ext[n]` over the single stacked
/// decision vector `x` identified by `var_id`. Constraints are the rows of
/// `a_ext` applied to `[x; 1]` (last column holds the constant offsets),
/// partitioned by `constraints`: equality rows first, then inequality/cone
/// rows in canonical order, exponential triples already permuted.
#[derive(Debug, Clone)]
pub struct CanonicalProblem {
    /// Identifier of the stacked decision-variable vector.
    pub var_id: VarId,
    /// Objective coefficients with a trailing constant entry.
    pub c_ext: Vec<f64>,
    /// Stacked affine map, one column per variable plus a constant column.
    pub a_ext: CscMatrix<f64>,
    /// Cone blocks matching the rows of `a_ext`, in canonical order.
    pub constraints: Vec<ConeConstraint>,
}

impl CanonicalProblem {
    /// Create a canonical problem, validating the shape invariants.
    ///
    /// Fails if the affine map's column count disagrees with `c_ext` or its
    /// row count disagrees with the declared cone blocks. Either mismatch is
    /// a canonicalization bug.
    pub fn new(
        var_id: VarId,
        c_ext: Vec<f64>,
        a_ext: CscMatrix<f64>,
        constraints: Vec<ConeConstraint>,
    ) -> Result<Self> {
        if c_ext.is_empty() || a_ext.ncols() != c_ext.len() {
            return Err(ReductionError::ShapeMismatch {
                expected: format!("{} columns", c_ext.len().max(1)),
                got: format!("{} columns", a_ext.ncols()),
            });
        }
        let declared: usize = constraints.iter().map(|c| c.rows()).sum();
        if a_ext.nrows() != declared {
            return Err(ReductionError::ShapeMismatch {
                expected: format!("{declared} rows"),
                got: format!("{} rows", a_ext.nrows()),
            });
        }
        Ok(CanonicalProblem {
            var_id,
            c_ext,
            a_ext,
            constraints,
        })
    }

    /// Number of decision variables (constant entry excluded).
    pub fn num_vars(&self) -> usize {
        self.c_ext.len() - 1
    }

    /// Total number of equality rows.
    pub fn len_eq(&self) -> usize {
        group_constraints(&self.constraints).len_eq()
    }

    /// Cone dimensions of the inequality/cone rows.
    pub fn cone_dims(&self) -> Result<ConeDims> {
        ConeDims::from_constraints(&self.constraints)
    }
}
