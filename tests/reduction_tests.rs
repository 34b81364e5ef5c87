//! End-to-end reduction tests with a scripted solver backend.
//!
//! The backend returns canned raw results and records the arguments it was
//! called with, so both directions of the translation can be checked against
//! the solver's call contract.

use nalgebra::DMatrix;

use ecos_reduction::prelude::*;
use ecos_reduction::sparse::csc_from_triplets;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-9;

/// Arguments captured from one backend call.
#[derive(Debug, Clone)]
struct CapturedCall {
    c: Vec<f64>,
    g: DMatrix<f64>,
    h: Vec<f64>,
    cones: SolverCones,
    a: DMatrix<f64>,
    b: Vec<f64>,
    verbose: bool,
    num_opts: usize,
    had_cache: bool,
}

/// A backend that replays a canned result and records its arguments.
struct ScriptedBackend {
    result: RawResult,
    calls: Vec<CapturedCall>,
}

impl ScriptedBackend {
    fn new(result: RawResult) -> Self {
        ScriptedBackend {
            result,
            calls: Vec::new(),
        }
    }
}

impl ConicBackend for ScriptedBackend {
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
    ) -> Result<RawResult> {
        self.calls.push(CapturedCall {
            c: c.to_vec(),
            g: g.clone(),
            h: h.to_vec(),
            cones: cones.clone(),
            a: a.clone(),
            b: b.to_vec(),
            verbose,
            num_opts: opts.iter().count(),
            had_cache: cache.is_some(),
        });
        Ok(self.result.clone())
    }
}

/// A backend whose external call always fails.
struct FailingBackend;

impl ConicBackend for FailingBackend {
    fn solve(
        &mut self,
        _c: &[f64],
        _g: &DMatrix<f64>,
        _h: &[f64],
        _cones: &SolverCones,
        _a: &DMatrix<f64>,
        _b: &[f64],
        _verbose: bool,
        _opts: &SolverOptions,
        _cache: Option<&mut SolverCache>,
    ) -> Result<RawResult> {
        Err(ReductionError::SolverFailure("segfault in solver".into()))
    }
}

/// minimize x0 + 2 x1 - 3  s.t.  x0 - 1 == 0,  x1 >= 0,  ||x1|| <= x0
///
/// Rows of the affine map (canonical order, A_ext [x; 1] in K):
///   0: x0 - 1          (Zero)
///   1: x1              (NonNeg)
///   2: x0              (Soc, t part)
///   3: x1              (Soc, x part)
fn socp_problem() -> CanonicalProblem {
    let a_ext = csc_from_triplets(
        4,
        3,
        vec![0, 0, 1, 2, 3],
        vec![0, 2, 1, 0, 1],
        vec![1.0, -1.0, 1.0, 1.0, 1.0],
    );
    CanonicalProblem::new(
        VarId::new(),
        vec![1.0, 2.0, -3.0],
        a_ext,
        vec![
            ConeConstraint::Zero { size: 1 },
            ConeConstraint::NonNeg { size: 1 },
            ConeConstraint::Soc { dim: 2 },
        ],
    )
    .unwrap()
}

fn optimal_raw() -> RawResult {
    RawResult {
        exit_flag: 0,
        x: vec![1.0, 0.0],
        y: vec![1.0],
        z: vec![2.0, 0.0, 0.0],
        info: RawInfo {
            pcost: 1.0,
            iter: 9,
            timing: RawTiming {
                tsolve: 0.004,
                tsetup: 0.002,
            },
        },
    }
}

#[test]
fn solver_receives_required_argument_layout() {
    let problem = socp_problem();
    let mut backend = ScriptedBackend::new(optimal_raw());

    let mut opts = SolverOptions::new();
    opts.set("maxit", OptionValue::Int(30));
    solve(&problem, &mut backend, true, &opts, None).unwrap();

    assert_eq!(backend.calls.len(), 1);
    let call = &backend.calls[0];

    // Objective: trailing constant stripped.
    assert_eq!(call.c, vec![1.0, 2.0]);

    // Equality block: negated coefficients, constant column as-is.
    assert_eq!(call.a.nrows(), 1);
    assert!((call.a[(0, 0)] + 1.0).abs() < TOL);
    assert!((call.b[0] + 1.0).abs() < TOL);

    // Inequality block: nonneg row, then the SOC rows, same sign flip.
    assert_eq!(call.g.nrows(), 3);
    assert!((call.g[(0, 1)] + 1.0).abs() < TOL);
    assert!((call.g[(1, 0)] + 1.0).abs() < TOL);
    assert!((call.g[(2, 1)] + 1.0).abs() < TOL);
    assert_eq!(call.h, vec![0.0, 0.0, 0.0]);

    // Cone schema: three fixed keys.
    assert_eq!(call.cones.l, 1);
    assert_eq!(call.cones.q, vec![2]);
    assert_eq!(call.cones.e, 0);

    // Verbosity and options pass through untouched.
    assert!(call.verbose);
    assert_eq!(call.num_opts, 1);
    assert!(!call.had_cache);
}

#[test]
fn equality_only_problem_yields_zero_inequality_rows() {
    // minimize x0  s.t.  x0 - 4 == 0
    let a_ext = csc_from_triplets(1, 2, vec![0, 0], vec![0, 1], vec![1.0, -4.0]);
    let problem = CanonicalProblem::new(
        VarId::new(),
        vec![1.0, 0.0],
        a_ext,
        vec![ConeConstraint::Zero { size: 1 }],
    )
    .unwrap();

    let (data, _) = apply(&problem).unwrap();
    assert_eq!(data.g.nrows(), 0);
    assert!(data.h.is_empty());

    let mut backend = ScriptedBackend::new(RawResult {
        exit_flag: 0,
        x: vec![4.0],
        y: vec![-1.0],
        z: vec![],
        info: RawInfo {
            pcost: 4.0,
            ..RawInfo::default()
        },
    });
    let result = solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();
    assert_eq!(result.status(), SolverStatus::Optimal);
    assert_eq!(backend.calls[0].g.nrows(), 0);
}

#[test]
fn round_trip_restores_objective_offset() {
    let problem = socp_problem();
    let (data, inv_data) = apply(&problem).unwrap();

    let mut backend = ScriptedBackend::new(optimal_raw());
    let raw = solve_via_data(
        &mut backend,
        &data,
        false,
        &SolverOptions::new(),
        None,
    )
    .unwrap();
    let result = invert(&raw, &inv_data).unwrap();

    let solution = result.as_solution().unwrap();
    assert!((solution.opt_val - (raw.info.pcost + inv_data.offset)).abs() < TOL);
    assert!((solution.opt_val - (1.0 - 3.0)).abs() < TOL);
}

#[test]
fn optimal_primal_map_has_single_entry_of_variable_length() {
    let problem = socp_problem();
    let mut backend = ScriptedBackend::new(optimal_raw());
    let result = solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();

    let solution = result.as_solution().unwrap();
    assert_eq!(solution.primal_vars.len(), 1);
    let x = solution
        .primal_vars
        .get(&problem.var_id)
        .expect("primal keyed by the problem's variable id");
    assert_eq!(x.len(), problem.num_vars());
}

#[test]
fn dual_concatenation_keeps_equality_block_first() {
    let problem = socp_problem();
    let mut backend = ScriptedBackend::new(optimal_raw());
    let result = solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();

    let solution = result.as_solution().unwrap();
    let duals = &solution.dual_vars[&DUAL_VAR_ID];
    assert_eq!(duals.as_slice(), &[1.0, 2.0, 0.0, 0.0]);
}

#[test]
fn infeasible_exit_flag_becomes_status_only_failure() {
    let problem = socp_problem();
    let mut backend = ScriptedBackend::new(RawResult {
        exit_flag: 1,
        ..RawResult::default()
    });
    let result = solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();

    assert!(result.is_failure());
    assert_eq!(result.status(), SolverStatus::Infeasible);
    assert!(result.as_solution().is_none());
}

#[test]
fn negative_exit_flags_collapse_to_solver_error() {
    let problem = socp_problem();
    for flag in [-1, -2, -3, -4, -7] {
        let mut backend = ScriptedBackend::new(RawResult {
            exit_flag: flag,
            ..RawResult::default()
        });
        let result =
            solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();
        assert_eq!(result.status(), SolverStatus::SolverError);
        assert!(result.is_failure());
    }
}

#[test]
fn inaccurate_optimal_still_carries_numeric_payload() {
    let problem = socp_problem();
    let mut raw = optimal_raw();
    raw.exit_flag = 10;
    let mut backend = ScriptedBackend::new(raw);
    let result = solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();

    let solution = result.as_solution().unwrap();
    assert_eq!(solution.status, SolverStatus::OptimalInaccurate);
    assert!(solution.status.is_inaccurate());
    assert_eq!(solution.primal_vars.len(), 1);
    assert_eq!(solution.attr.exit_flag, 10);
}

#[test]
fn backend_failure_propagates_unchanged() {
    let problem = socp_problem();
    let err = solve(
        &problem,
        &mut FailingBackend,
        false,
        &SolverOptions::new(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ReductionError::SolverFailure(_)));
}

#[test]
fn cache_is_threaded_through_opaquely() {
    let problem = socp_problem();
    let mut backend = ScriptedBackend::new(optimal_raw());
    let mut cache = SolverCache::new(42_u32);
    solve(
        &problem,
        &mut backend,
        false,
        &SolverOptions::new(),
        Some(&mut cache),
    )
    .unwrap();
    assert!(backend.calls[0].had_cache);
    // Untouched by the reduction.
    assert_eq!(*cache.downcast_mut::<u32>().unwrap(), 42);
}

#[test]
fn exp_cone_problem_reports_triple_count() {
    // One equality row plus two exponential triples (rows already permuted
    // upstream by EXP_CONE_ORDER when the map was stacked).
    let a_ext = csc_from_triplets(7, 2, vec![0], vec![0], vec![1.0]);
    let problem = CanonicalProblem::new(
        VarId::new(),
        vec![1.0, 0.0],
        a_ext,
        vec![
            ConeConstraint::Zero { size: 1 },
            ConeConstraint::Exp { count: 2 },
        ],
    )
    .unwrap();

    let mut backend = ScriptedBackend::new(RawResult {
        exit_flag: 0,
        x: vec![0.0],
        y: vec![0.0],
        z: vec![0.0; 6],
        info: RawInfo::default(),
    });
    solve(&problem, &mut backend, false, &SolverOptions::new(), None).unwrap();

    let call = &backend.calls[0];
    assert_eq!(call.cones.e, 2);
    assert_eq!(call.g.nrows(), 6);
}

#[test]
fn status_mapping_is_deterministic() {
    for flag in [0, 1, 2, 10, 11, 12, -1, -2, -3, -4, -7] {
        let first = status_from_exit_flag(flag).unwrap();
        let second = status_from_exit_flag(flag).unwrap();
        assert_eq!(first, second);
    }
}
