//! The external solver call contract.
//!
//! [`ConicBackend`] fixes the argument layout the solver's single entry
//! point takes, and [`RawResult`] is the one type in this crate whose field
//! names track the solver's interface. Nothing outside this module and the
//! translation in [`crate::solver::ecos`] depends on those names.

use std::any::Any;
use std::collections::HashMap;

use nalgebra::DMatrix;

use crate::error::Result;

/// Cone sizes in the solver's keyword schema.
///
/// `l` is the nonnegative orthant row count, `q` the second-order cone
/// dimensions, `e` the exponential cone count (triples, not rows).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverCones {
    /// Linear (nonnegative orthant) row count.
    pub l: usize,
    /// Second-order cone dimensions.
    pub q: Vec<usize>,
    /// Exponential cone count.
    pub e: usize,
}

/// A pass-through solver option value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue {
    /// Boolean option.
    Bool(bool),
    /// Integer option.
    Int(i64),
    /// Floating-point option.
    Float(f64),
}

/// Arbitrary keyword options forwarded to the solver unmodified.
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    options: HashMap<String, OptionValue>,
}

impl SolverOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: OptionValue) {
        self.options.insert(key.into(), value);
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Iterate over all options.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.options.iter()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Opaque warm-start state reused across related solves.
///
/// The reduction threads this through to the backend untouched; only the
/// backend that created it knows what is inside.
pub struct SolverCache(Box<dyn Any + Send>);

impl SolverCache {
    /// Wrap backend-owned state.
    pub fn new(state: impl Any + Send) -> Self {
        SolverCache(Box::new(state))
    }

    /// Downcast to the backend's state type.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut()
    }
}

impl std::fmt::Debug for SolverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SolverCache(..)")
    }
}

/// Timing sub-record of the raw result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawTiming {
    /// Solve phase time in seconds.
    pub tsolve: f64,
    /// Setup phase time in seconds.
    pub tsetup: f64,
}

/// Info record of the raw result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawInfo {
    /// Primal objective value at termination.
    pub pcost: f64,
    /// Iteration count.
    pub iter: u32,
    /// Timing record.
    pub timing: RawTiming,
}

/// Raw output of one solver call, returned unmodified by the backend.
///
/// `y` is the dual for the equality block, `z` the dual for the
/// inequality/cone block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResult {
    /// Solver exit flag.
    pub exit_flag: i32,
    /// Primal solution vector.
    pub x: Vec<f64>,
    /// Equality-block dual vector.
    pub y: Vec<f64>,
    /// Inequality/cone-block dual vector.
    pub z: Vec<f64>,
    /// Nested info record.
    pub info: RawInfo,
}

/// The narrow call contract to the external conic solver.
///
/// One blocking call; the implementation must return its result unmodified
/// and surface its own failures as errors, which the reduction propagates
/// without retry or suppression.
pub trait ConicBackend {
    /// Solve `min c.x  s.t.  a x = b,  h - g x in K`, with K described by
    /// `cones`.
    #[allow(clippy::too_many_arguments)]
    fn solve(
        &mut self,
        c: &[f64],
        g: &DMatrix<f64>,
        h: &[f64],
        cones: &SolverCones,
        a: &DMatrix<f64>,
        b: &[f64],
        verbose: bool,
        opts: &SolverOptions,
        cache: Option<&mut SolverCache>,
    ) -> Result<RawResult>;
}
