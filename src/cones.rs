//! Cone constraint descriptors, dimensions, and the solver row order.
//!
//! The target solver requires constraint rows in a fixed order:
//! 1. zero cone (equalities)
//! 2. nonnegative orthant
//! 3. second-order cones, in declaration order
//! 4. exponential cones
//!
//! Within each exponential triple the coordinates are permuted by
//! [`EXP_CONE_ORDER`] from the library's (x, y, z) convention to the
//! solver's. The upstream canonicalizer applies this order when stacking the
//! affine map; the translation in [`crate::solver::ecos`] relies on it and
//! never recomputes it.

use crate::error::{ReductionError, Result};

/// Order of exponential cone coordinates expected by the solver.
pub const EXP_CONE_ORDER: [usize; 3] = [0, 2, 1];

/// A canonicalized cone constraint, reduced to its block-size description.
///
/// Canonicalization owns the affine expressions; by the time a problem
/// reaches this reduction only the block sizes matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConeConstraint {
    /// Equality block: expr == 0, `size` scalar rows.
    Zero {
        /// Number of scalar equality rows.
        size: usize,
    },
    /// Nonnegative orthant block: expr >= 0, `size` scalar rows.
    NonNeg {
        /// Number of scalar inequality rows.
        size: usize,
    },
    /// Second-order cone block: ||x||_2 <= t, `dim` rows including t.
    Soc {
        /// Total cone dimension (t plus the vector argument).
        dim: usize,
    },
    /// Exponential cone block: `count` (x, y, z) triples, three rows each.
    Exp {
        /// Number of triples.
        count: usize,
    },
    /// Power cone block: one (x, y, z) triple with exponent `alpha`.
    ///
    /// Part of the library vocabulary but not supported by this solver;
    /// encountering one here is an upstream bug.
    Power {
        /// Cone exponent.
        alpha: f64,
    },
}

impl ConeConstraint {
    /// Number of scalar rows this constraint occupies in the affine map.
    pub fn rows(&self) -> usize {
        match self {
            ConeConstraint::Zero { size } | ConeConstraint::NonNeg { size } => *size,
            ConeConstraint::Soc { dim } => *dim,
            ConeConstraint::Exp { count } => 3 * count,
            ConeConstraint::Power { .. } => 3,
        }
    }
}

/// Constraints partitioned by type, declaration order preserved within each
/// group. Only the block sizes are kept.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGroups {
    /// Sizes of equality blocks.
    pub zero: Vec<usize>,
    /// Sizes of nonnegative orthant blocks.
    pub nonneg: Vec<usize>,
    /// Dimensions of second-order cone blocks.
    pub soc: Vec<usize>,
    /// Triple counts of exponential cone blocks.
    pub exp: Vec<usize>,
    /// Exponents of power cone blocks.
    pub power: Vec<f64>,
}

impl ConstraintGroups {
    /// Total number of equality rows.
    pub fn len_eq(&self) -> usize {
        self.zero.iter().sum()
    }
}

/// Partition constraints by type.
pub fn group_constraints(constraints: &[ConeConstraint]) -> ConstraintGroups {
    let mut groups = ConstraintGroups::default();
    for c in constraints {
        match c {
            ConeConstraint::Zero { size } => groups.zero.push(*size),
            ConeConstraint::NonNeg { size } => groups.nonneg.push(*size),
            ConeConstraint::Soc { dim } => groups.soc.push(*dim),
            ConeConstraint::Exp { count } => groups.exp.push(*count),
            ConeConstraint::Power { alpha } => groups.power.push(*alpha),
        }
    }
    groups
}

/// Per-cone-type element counts for the solver's keyword schema.
///
/// The zero cone count is tracked separately as `len_eq`: the solver takes
/// equalities through a dedicated (matrix, vector) pair rather than the cone
/// dictionary. Invariant: `len_eq + total()` equals the row count of the
/// stacked affine map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConeDims {
    /// Number of nonnegative orthant rows.
    pub nonneg: usize,
    /// Second-order cone dimensions, one entry per block.
    pub soc: Vec<usize>,
    /// Number of exponential cone triples (three rows each).
    pub exp: usize,
}

impl ConeDims {
    /// Compute cone dimensions from grouped constraints.
    ///
    /// Fails if a power cone is present; the solver has no cone for it.
    pub fn from_groups(groups: &ConstraintGroups) -> Result<Self> {
        if !groups.power.is_empty() {
            return Err(ReductionError::UnsupportedConstraint("power cone"));
        }
        Ok(ConeDims {
            nonneg: groups.nonneg.iter().sum(),
            soc: groups.soc.clone(),
            exp: groups.exp.iter().sum(),
        })
    }

    /// Compute cone dimensions directly from a constraint list.
    pub fn from_constraints(constraints: &[ConeConstraint]) -> Result<Self> {
        Self::from_groups(&group_constraints(constraints))
    }

    /// Total number of inequality/cone rows (equality rows excluded).
    pub fn total(&self) -> usize {
        self.nonneg + self.soc.iter().sum::<usize>() + 3 * self.exp
    }
}

/// Compute the solver's canonical row order for a declaration-order list of
/// constraints.
///
/// Returns, for each solver row, the index of the declaration-order row that
/// must occupy it. Blocks keep their internal order except exponential
/// triples, whose coordinates are permuted by [`EXP_CONE_ORDER`].
pub fn solver_row_order(constraints: &[ConeConstraint]) -> Result<Vec<usize>> {
    // Row offset of each constraint in declaration order.
    let mut offsets = Vec::with_capacity(constraints.len());
    let mut total = 0;
    for c in constraints {
        offsets.push(total);
        total += c.rows();
    }

    let mut order = Vec::with_capacity(total);

    for (c, &off) in constraints.iter().zip(&offsets) {
        if let ConeConstraint::Zero { size } = c {
            order.extend(off..off + size);
        }
    }
    for (c, &off) in constraints.iter().zip(&offsets) {
        if let ConeConstraint::NonNeg { size } = c {
            order.extend(off..off + size);
        }
    }
    for (c, &off) in constraints.iter().zip(&offsets) {
        if let ConeConstraint::Soc { dim } = c {
            order.extend(off..off + dim);
        }
    }
    for (c, &off) in constraints.iter().zip(&offsets) {
        match c {
            ConeConstraint::Exp { count } => {
                for t in 0..*count {
                    for &k in &EXP_CONE_ORDER {
                        order.push(off + 3 * t + k);
                    }
                }
            }
            ConeConstraint::Power { .. } => {
                return Err(ReductionError::UnsupportedConstraint("power cone"));
            }
            _ => {}
        }
    }

    Ok(order)
}
