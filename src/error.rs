//! Error types for the reduction.

use thiserror::Error;

/// Error type for reduction operations.
///
/// The first three variants are contract violations: they indicate a bug in
/// an upstream collaborator (canonicalization produced something this solver
/// cannot take) or a drift in the external solver's interface. They are not
/// recoverable. `SolverFailure` wraps a failure raised by the external call
/// itself and is propagated unchanged.
#[derive(Debug, Error)]
pub enum ReductionError {
    /// A constraint type the target solver does not support.
    #[error("Unsupported constraint type: {0}")]
    UnsupportedConstraint(&'static str),

    /// Shape mismatch between the affine map and the declared cones.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// An exit flag outside the solver's documented status table.
    #[error("Unknown solver exit flag: {0}")]
    UnknownExitFlag(i32),

    /// The external solver call itself failed.
    #[error("Solver failure: {0}")]
    SolverFailure(String),
}

/// Result type for reduction operations.
pub type Result<T> = std::result::Result<T, ReductionError>;
