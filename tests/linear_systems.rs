use approx::assert_abs_diff_eq;
use rand::prelude::*;
use gauss_linsys::{
    eliminate, factorize_cholesky, factorize_ldlt, factorize_lu, factorize_plu, solve_lu,
    solve_plu, DynMatrix, DynVector, FactorKind, Factorization, LinalgError, PivotPolicy,
    SolverSettings,
};

const TOL: f64 = 1e-10;

fn assert_vec_near(got: &DynVector<f64>, want: &[f64], msg: &str) {
    assert_eq!(got.len(), want.len(), "{}: length", msg);
    for i in 0..want.len() {
        assert!(
            (got[i] - want[i]).abs() < TOL,
            "{}: x[{}] = {} vs {}",
            msg,
            i,
            got[i],
            want[i]
        );
    }
}

fn residual(a: &DynMatrix<f64>, x: &DynVector<f64>, b: &DynVector<f64>) -> f64 {
    let ax = a * x;
    (0..b.len()).fold(0.0, |acc, i| acc.max((ax[i] - b[i]).abs()))
}

fn spd3() -> (DynMatrix<f64>, DynVector<f64>) {
    let a = DynMatrix::from_nested(&[[4.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 4.0]]);
    let b = DynVector::from_slice(&[2.0, 6.0, 2.0]);
    (a, b)
}

// ── Elimination ──────────────────────────────────────────────────────

#[test]
fn pivot_policies_agree_on_nonsingular_system() {
    let a = DynMatrix::from_nested(&[
        [1.0, 2.0, -1.0, 3.0],
        [2.0, -1.0, 4.0, 1.0],
        [-3.0, 1.0, 2.0, -2.0],
        [1.0, 5.0, -2.0, 2.0],
    ]);
    let b = DynVector::from_slice(&[5.0, 12.0, -4.0, 8.0]);
    let xs: Vec<_> = PivotPolicy::ALL
        .iter()
        .map(|&p| eliminate(&a, &b, p).unwrap().value.x)
        .collect();
    for (x, policy) in xs.iter().zip(PivotPolicy::ALL) {
        assert!(residual(&a, x, &b) < TOL, "{} residual", policy);
        for i in 0..4 {
            assert_abs_diff_eq!(x[i], xs[0][i], epsilon = TOL);
        }
    }
}

#[test]
fn textbook_system_with_row_ties() {
    let a = DynMatrix::from_nested(&[[2.0, -1.0, 1.0], [3.0, 3.0, 9.0], [3.0, 3.0, 5.0]]);
    let b = DynVector::from_slice(&[2.0, -1.0, 4.0]);
    for policy in PivotPolicy::ALL {
        let sol = eliminate(&a, &b, policy).unwrap();
        assert!(residual(&a, &sol.value.x, &b) < TOL, "{}", policy);
        assert!(sol.value.row_order.is_bijection());
        assert!(sol.value.col_order.is_bijection());
    }
}

#[test]
fn upper_triangular_input_needs_no_swaps() {
    let a = DynMatrix::from_nested(&[[2.0, 1.0, 1.0], [0.0, 3.0, 1.0], [0.0, 0.0, 4.0]]);
    let b = DynVector::from_slice(&[4.0, 4.0, 4.0]);
    let sol = eliminate(&a, &b, PivotPolicy::Partial).unwrap().value;
    assert_vec_near(&sol.x, &[1.0, 1.0, 1.0], "triangular");
    assert_eq!(sol.row_order.as_slice(), &[0, 1, 2]);
    assert_eq!(sol.upper, a);
}

#[test]
fn total_pivoting_returns_original_variable_order() {
    // The largest entry sits in the last column, forcing a column swap.
    let a = DynMatrix::from_nested(&[[1.0, 2.0, 10.0], [2.0, 1.0, 1.0], [1.0, 3.0, 2.0]]);
    let x_true = [1.0, -2.0, 3.0];
    let b = &a * &DynVector::from_slice(&x_true);
    let sol = eliminate(&a, &b, PivotPolicy::Total).unwrap().value;
    assert_ne!(sol.col_order.as_slice(), &[0, 1, 2]);
    assert_vec_near(&sol.x, &x_true, "total");
}

#[test]
fn singular_system_fails_for_every_policy() {
    let a = DynMatrix::from_nested(&[[1.0, 2.0], [2.0, 4.0]]);
    let b = DynVector::from_slice(&[3.0, 6.0]);
    for policy in PivotPolicy::ALL {
        let err = eliminate(&a, &b, policy).unwrap_err();
        assert!(
            matches!(err.error, LinalgError::Singular { .. }),
            "{}: {:?}",
            policy,
            err.error
        );
        assert!(!err.error.is_input_error());
        // trail up to the failure is kept
        assert!(err.trail.contains("GAUSSIAN ELIMINATION"));
        assert!(err.trail.contains("ERROR"));
    }
}

#[test]
fn dimension_mismatch_is_an_input_error() {
    let (a, _) = spd3();
    let err = eliminate(&a, &DynVector::from_slice(&[1.0, 2.0]), PivotPolicy::Scaled).unwrap_err();
    assert_eq!(err.error, LinalgError::DimensionMismatch { expected: 3, got: 2 });
    assert!(err.error.is_input_error());
}

#[test]
fn inputs_are_untouched() {
    let (a, b) = spd3();
    let (a0, b0) = (a.clone(), b.clone());
    let _ = eliminate(&a, &b, PivotPolicy::Total).unwrap();
    let _ = factorize_plu(&a).unwrap();
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}

// ── Factorizations ───────────────────────────────────────────────────

#[test]
fn spd_system_through_every_factorization() {
    let (a, b) = spd3();
    let want = [1.0, 2.0, 1.0];

    let lu = factorize_lu(&a).unwrap().value;
    assert_vec_near(&solve_lu(&lu.l, &lu.u, &b).unwrap().value, &want, "LU");

    let plu = factorize_plu(&a).unwrap().value;
    assert_vec_near(&solve_plu(&plu.p, &plu.l, &plu.u, &b).unwrap().value, &want, "PLU");

    let chol = factorize_cholesky(&a).unwrap().value;
    assert_vec_near(&chol.solve(&b).unwrap().value, &want, "Cholesky");

    let ldlt = factorize_ldlt(&a).unwrap().value;
    assert_vec_near(&ldlt.solve(&b).unwrap().value, &want, "LDLᵀ");

    let x = a.solve_gauss(&b, PivotPolicy::Partial).unwrap();
    assert_vec_near(&x, &want, "elimination");
}

#[test]
fn factorizations_reconstruct_input() {
    let (a, _) = spd3();
    for kind in FactorKind::ALL {
        let f = Factorization::factorize(&a, kind).unwrap();
        assert!(f.value.reconstruct().max_abs_diff(&a) < TOL, "{}", kind);
        assert!(f.trail.contains("Check:"), "{} verification block", kind);
    }
}

#[test]
fn plu_succeeds_where_lu_needs_a_swap() {
    let a = DynMatrix::from_nested(&[[0.0, 2.0, 1.0], [1.0, -2.0, -3.0], [-1.0, 1.0, 2.0]]);
    let lu_err = factorize_lu(&a).unwrap_err();
    assert_eq!(lu_err.error, LinalgError::ZeroPivot { step: 0 });

    let plu = factorize_plu(&a).unwrap().value;
    let pa = &plu.p * &a;
    let lu = &plu.l * &plu.u;
    assert!(pa.max_abs_diff(&lu) < TOL);

    let x_true = DynVector::from_slice(&[-1.0, 2.0, 1.5]);
    let b = &a * &x_true;
    let x = plu.solve(&b).unwrap().value;
    assert_vec_near(&x, x_true.as_slice(), "PLU solve");
}

#[test]
fn cholesky_rejects_non_positive_definite() {
    let a = DynMatrix::from_nested(&[[1.0, 2.0, 0.0], [2.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    let err = factorize_cholesky(&a).unwrap_err();
    assert_eq!(err.error, LinalgError::NotPositiveDefinite { column: 1 });
    assert!(err.trail.contains("CHOLESKY"));
}

#[test]
fn ldlt_handles_symmetric_indefinite() {
    let a = DynMatrix::from_nested(&[[1.0, 2.0, 0.0], [2.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    let f = factorize_ldlt(&a).unwrap().value;
    assert_eq!(f.d.as_slice(), &[1.0, -3.0, 1.0]);
    assert!(f.reconstruct().max_abs_diff(&a) < TOL);
    let b = DynVector::from_slice(&[3.0, 3.0, 5.0]);
    assert_vec_near(&f.solve(&b).unwrap().value, &[1.0, 1.0, 5.0], "LDLᵀ indefinite");
}

#[test]
fn custom_tolerance_and_precision() {
    let a = DynMatrix::from_nested(&[[1.0, 1.0], [1.0, 1.0 + 1e-9]]);
    let b = DynVector::from_slice(&[2.0, 2.0]);
    assert!(eliminate(&a, &b, PivotPolicy::Partial).is_ok());

    let settings = SolverSettings::<f64>::default()
        .with_pivot_tol(1e-6)
        .with_precision(2);
    let err = gauss_linsys::eliminate_with(&a, &b, PivotPolicy::Partial, &settings).unwrap_err();
    assert_eq!(err.error, LinalgError::Singular { step: 1 });
    assert_eq!(err.trail.precision(), 2);
}

// ── Random sweep ─────────────────────────────────────────────────────

/// Random entries in `[-1, 1)` with `n` added to the diagonal, so every row
/// is strictly diagonally dominant and the matrix is nonsingular.
fn dominant(rng: &mut StdRng, n: usize) -> DynMatrix<f64> {
    let data: Vec<f64> = (0..n * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let mut a = DynMatrix::from_rows(n, n, &data);
    for i in 0..n {
        a[(i, i)] += n as f64;
    }
    a
}

#[test]
fn random_systems_up_to_eight() {
    let rng = &mut StdRng::seed_from_u64(0);
    for n in 1..=8 {
        for _ in 0..4 {
            let a = dominant(rng, n);
            let b = DynVector::from_vec((0..n).map(|_| rng.gen_range(-1.0..1.0)).collect());

            for policy in PivotPolicy::ALL {
                let x = eliminate(&a, &b, policy).unwrap().value.x;
                assert!(residual(&a, &x, &b) < TOL, "n = {n}, {policy}");
            }

            let plu = factorize_plu(&a).unwrap().value;
            let pa = &plu.p * &a;
            assert!(pa.max_abs_diff(&(&plu.l * &plu.u)) < TOL, "P·A = L·U, n = {n}");
            let x = plu.solve(&b).unwrap().value;
            assert!(residual(&a, &x, &b) < TOL, "PLU solve, n = {n}");

            let mut spd = &a * &a.transpose();
            for i in 0..n {
                spd[(i, i)] += 1.0;
            }
            let chol = factorize_cholesky(&spd).unwrap().value;
            assert!(chol.reconstruct().max_abs_diff(&spd) < TOL, "L·Lᵀ, n = {n}");
            let x = chol.solve(&b).unwrap().value;
            assert!(residual(&spd, &x, &b) < TOL, "Cholesky solve, n = {n}");
        }
    }
}
