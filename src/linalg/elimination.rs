use core::fmt;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::substitution::back_substitute;
use crate::linalg::{
    check_rhs, check_square, negligible, LinalgError, SolverSettings, Traced, TracedError,
};
use crate::permutation::Permutation;
use crate::trail::Trail;
use crate::traits::FloatScalar;

/// Pivot-selection rule for Gaussian elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotPolicy {
    /// Row swap bringing the largest `|a_ik|` of the active column to the diagonal.
    Partial,
    /// Row swap maximizing `|a_ik| / s_i`, with `s_i` the largest magnitude of
    /// the original row `i`.
    Scaled,
    /// Row and column swap bringing the largest entry of the active
    /// submatrix to the diagonal.
    Total,
}

impl PivotPolicy {
    pub const ALL: [PivotPolicy; 3] = [PivotPolicy::Partial, PivotPolicy::Scaled, PivotPolicy::Total];
}

impl fmt::Display for PivotPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotPolicy::Partial => write!(f, "partial pivoting"),
            PivotPolicy::Scaled => write!(f, "scaled pivoting"),
            PivotPolicy::Total => write!(f, "total pivoting"),
        }
    }
}

/// Result of Gaussian elimination.
#[derive(Debug, Clone, PartialEq)]
pub struct Elimination<T> {
    /// Solution in original variable order.
    pub x: DynVector<T>,
    /// The upper-triangular system left after elimination.
    pub upper: DynMatrix<T>,
    /// The right-hand side after the same row operations.
    pub rhs: DynVector<T>,
    /// `row_order[i]` is the original row now at row `i`.
    pub row_order: Permutation,
    /// `col_order[i]` is the original variable now at column `i`.
    /// The identity unless the policy is [`PivotPolicy::Total`].
    pub col_order: Permutation,
}

/// Solve `A·x = b` by Gaussian elimination under `policy`, with default settings.
///
/// `a` and `b` are copied; the caller's values are never touched.
///
/// # Errors
///
/// [`LinalgError::NotSquare`] / [`LinalgError::DimensionMismatch`] before any
/// arithmetic, [`LinalgError::Singular`] when a selected pivot (the final
/// diagonal entry included) has magnitude below the pivot tolerance. The
/// error carries the trail recorded so far.
///
/// # Example
///
/// ```
/// use gauss_linsys::{eliminate, DynMatrix, DynVector, PivotPolicy};
///
/// let a = DynMatrix::from_rows(3, 3, &[
///     2.0_f64, -1.0, 1.0,
///     3.0, 3.0, 9.0,
///     3.0, 3.0, 5.0,
/// ]);
/// let b = DynVector::from_slice(&[2.0, -1.0, 4.0]);
/// let sol = eliminate(&a, &b, PivotPolicy::Total).unwrap();
/// let ax = &a * &sol.value.x;
/// for i in 0..3 {
///     assert!((ax[i] - b[i]).abs() < 1e-10);
/// }
/// ```
pub fn eliminate<T: FloatScalar>(
    a: &DynMatrix<T>,
    b: &DynVector<T>,
    policy: PivotPolicy,
) -> Result<Traced<Elimination<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    eliminate_with(a, b, policy, &SolverSettings::default())
}

/// [`eliminate`] with explicit settings.
pub fn eliminate_with<T: FloatScalar>(
    a: &DynMatrix<T>,
    b: &DynVector<T>,
    policy: PivotPolicy,
    settings: &SolverSettings<T>,
) -> Result<Traced<Elimination<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner(&format!("GAUSSIAN ELIMINATION - {}", policy.to_string().to_uppercase()));

    let n = check_square(a, &trail)?;
    check_rhs(n, b.len(), &trail)?;

    let mut m = a.clone();
    let mut rhs = b.as_slice().to_vec();
    let mut rows = Permutation::identity(n);
    let mut cols = Permutation::identity(n);

    trail.augmented("Initial augmented matrix", &m, &rhs);

    let mut scale = match policy {
        PivotPolicy::Scaled => Some(row_scales(&m, &mut trail)),
        _ => None,
    };
    if policy == PivotPolicy::Total {
        trail.push("The solution is reordered by the column order at the end");
        trail.push(format!("Initial column order: {}", cols));
    }

    for k in 0..n.saturating_sub(1) {
        trail.section(&format!("Step k = {}: column {}", k + 1, k + 1));

        let (prow, pcol) = match policy {
            PivotPolicy::Partial => (partial_pivot(&m, k, &mut trail), k),
            PivotPolicy::Scaled => (scaled_pivot(&m, k, scale.as_deref().unwrap_or(&[]), &mut trail), k),
            PivotPolicy::Total => total_pivot(&m, k, &mut trail),
        };

        if prow != k {
            log::debug!("step {}: swap rows {} and {}", k + 1, k + 1, prow + 1);
            m.swap_rows(k, prow);
            rhs.swap(k, prow);
            rows.swap(k, prow);
            if let Some(s) = scale.as_mut() {
                s.swap(k, prow);
                trail.push(format!("Swap R{} ↔ R{} (and their scale factors)", k + 1, prow + 1));
            } else {
                trail.push(format!("Swap R{} ↔ R{}", k + 1, prow + 1));
            }
        }
        if pcol != k {
            log::debug!("step {}: swap columns {} and {}", k + 1, k + 1, pcol + 1);
            m.swap_cols(k, pcol);
            cols.swap(k, pcol);
            trail.push(format!("Swap C{} ↔ C{}", k + 1, pcol + 1));
        }
        if prow == k && pcol == k {
            trail.push("No swap required");
        } else {
            if policy == PivotPolicy::Total {
                trail.push(format!("Current column order: {}", cols));
            }
            trail.augmented("After swapping", &m, &rhs);
        }

        let pivot = m[(k, k)];
        if negligible(pivot, settings.pivot_tol) {
            trail.push(format!("Pivot a[{},{}] = {} is near zero", k + 1, k + 1, trail.num(pivot)));
            return Err(TracedError::new(LinalgError::Singular { step: k }, trail));
        }

        trail.push("Multipliers and row operations:");
        for i in (k + 1)..n {
            let factor = m[(i, k)] / pivot;
            trail.push(format!(
                "  m_{i1} = a[{i1},{k1}]/a[{k1},{k1}] = {}/{} = {}",
                trail.num(m[(i, k)]),
                trail.num(pivot),
                trail.num(factor),
                i1 = i + 1,
                k1 = k + 1,
            ));
            trail.push(format!("  R{} ← R{} - ({})·R{}", i + 1, i + 1, trail.num(factor), k + 1));
            for j in k..n {
                m[(i, j)] = m[(i, j)] - factor * m[(k, j)];
            }
            rhs[i] = rhs[i] - factor * rhs[k];
        }

        trail.augmented(&format!("Matrix after k = {}", k + 1), &m, &rhs);
    }

    if n > 0 {
        let last = n - 1;
        let pivot = m[(last, last)];
        if negligible(pivot, settings.pivot_tol) {
            trail.push(format!("Final pivot a[{},{}] = {} is near zero", n, n, trail.num(pivot)));
            return Err(TracedError::new(LinalgError::Singular { step: last }, trail));
        }
    }

    trail.banner("BACK SUBSTITUTION");
    let unknown = if policy == PivotPolicy::Total { "v" } else { "x" };
    let solved = back_substitute(&m, &rhs, (unknown, "b"), &mut trail);

    let x = if policy == PivotPolicy::Total {
        trail.banner("SOLUTION REORDERING");
        trail.push(format!("Final column order: {}", cols));
        trail.vector("v", &solved);
        for (i, &orig) in cols.as_slice().iter().enumerate() {
            trail.push(format!("  x_{} = v_{} = {}", orig + 1, i + 1, trail.num(solved[i])));
        }
        cols.scatter(&solved)
    } else {
        solved
    };

    trail.banner("SOLUTION");
    trail.vector("x", &x);

    Ok(Traced {
        value: Elimination {
            x: DynVector::from_vec(x),
            upper: m,
            rhs: DynVector::from_vec(rhs),
            row_order: rows,
            col_order: cols,
        },
        trail,
    })
}

/// `s_i = max_j |a_ij|` over each original row.
fn row_scales<T: FloatScalar>(m: &DynMatrix<T>, trail: &mut Trail) -> Vec<T> {
    trail.push("Scale factors (largest magnitude per row):");
    (0..m.nrows())
        .map(|i| {
            let s = m
                .row_slice(i)
                .iter()
                .fold(T::zero(), |acc, &v| acc.max(v.abs()));
            trail.push(format!("  s_{} = {}", i + 1, trail.num(s)));
            s
        })
        .collect()
}

/// First row in `k..n` with the largest `|a_ik|`; ties keep the earliest row.
fn partial_pivot<T: FloatScalar>(m: &DynMatrix<T>, k: usize, trail: &mut Trail) -> usize {
    let mut best = k;
    let mut best_val = m[(k, k)].abs();
    trail.push(format!("Searching column {} for the largest |a_ik|:", k + 1));
    for i in k..m.nrows() {
        let val = m[(i, k)].abs();
        trail.push(format!("  |a[{},{}]| = {}", i + 1, k + 1, trail.num(val)));
        if val > best_val {
            best_val = val;
            best = i;
        }
    }
    trail.push(format!("Largest: {} in row {}", trail.num(best_val), best + 1));
    best
}

/// First row in `k..n` with the largest `|a_ik| / s_i`; rows with `s_i = 0`
/// score zero.
fn scaled_pivot<T: FloatScalar>(m: &DynMatrix<T>, k: usize, scale: &[T], trail: &mut Trail) -> usize {
    let ratio = |i: usize| {
        let s = scale.get(i).copied().unwrap_or_else(T::zero);
        if s > T::zero() {
            m[(i, k)].abs() / s
        } else {
            T::zero()
        }
    };

    let mut best = k;
    let mut best_ratio = ratio(k);
    trail.push("Ratios r_i = |a_ik| / s_i:");
    for i in k..m.nrows() {
        let r = ratio(i);
        trail.push(format!(
            "  r_{} = {} / {} = {}",
            i + 1,
            trail.num(m[(i, k)].abs()),
            trail.num(scale.get(i).copied().unwrap_or_else(T::zero)),
            trail.num(r),
        ));
        if r > best_ratio {
            best_ratio = r;
            best = i;
        }
    }
    trail.push(format!("Largest ratio: {} in row {}", trail.num(best_ratio), best + 1));
    best
}

/// Position of the largest `|a_ij|` in the submatrix `[k.., k..]`, scanned
/// row by row; ties keep the first one found.
fn total_pivot<T: FloatScalar>(m: &DynMatrix<T>, k: usize, trail: &mut Trail) -> (usize, usize) {
    let n = m.nrows();
    let mut best = (k, k);
    let mut best_val = m[(k, k)].abs();
    for i in k..n {
        for j in k..n {
            let val = m[(i, j)].abs();
            if val > best_val {
                best_val = val;
                best = (i, j);
            }
        }
    }
    trail.push(format!(
        "Largest in submatrix [{}:{}, {}:{}]: {} at ({}, {})",
        k + 1,
        n,
        k + 1,
        n,
        trail.num(best_val),
        best.0 + 1,
        best.1 + 1,
    ));
    best
}

/// Convenience methods on matrices.
impl<T: FloatScalar> DynMatrix<T>
where
    SolverSettings<T>: Default,
{
    /// Solve `A·x = b` by Gaussian elimination, discarding the audit trail.
    ///
    /// ```
    /// use gauss_linsys::{DynMatrix, DynVector, PivotPolicy};
    /// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 2.0, 1.0, 4.0]);
    /// let b = DynVector::from_slice(&[7.0, 9.0]);
    /// let x = a.solve_gauss(&b, PivotPolicy::Scaled).unwrap();
    /// assert!((x[0] - 1.0).abs() < 1e-12);
    /// assert!((x[1] - 2.0).abs() < 1e-12);
    /// ```
    pub fn solve_gauss(&self, b: &DynVector<T>, policy: PivotPolicy) -> Result<DynVector<T>, LinalgError> {
        Ok(eliminate(self, b, policy)?.value.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn residual(a: &DynMatrix<f64>, x: &DynVector<f64>, b: &DynVector<f64>) -> f64 {
        let ax = a * x;
        (0..b.len()).fold(0.0, |acc, i| acc.max((ax[i] - b[i]).abs()))
    }

    fn textbook() -> (DynMatrix<f64>, DynVector<f64>) {
        let a = DynMatrix::from_rows(3, 3, &[2.0, -1.0, 1.0, 3.0, 3.0, 9.0, 3.0, 3.0, 5.0]);
        let b = DynVector::from_slice(&[2.0, -1.0, 4.0]);
        (a, b)
    }

    #[test]
    fn partial_picks_first_maximum() {
        let (a, b) = textbook();
        let sol = eliminate(&a, &b, PivotPolicy::Partial).unwrap();
        // Row 2 (value 3) beats row 1 (value 2) and ties with row 3.
        assert_eq!(sol.value.row_order.as_slice()[0], 1);
        assert!(sol.trail.contains("Swap R1 ↔ R2"));
        assert!(residual(&a, &sol.value.x, &b) < 1e-10);
    }

    #[test]
    fn every_policy_solves_textbook_system() {
        let (a, b) = textbook();
        for policy in PivotPolicy::ALL {
            let sol = eliminate(&a, &b, policy).unwrap();
            assert!(residual(&a, &sol.value.x, &b) < 1e-10, "{}", policy);
            assert!(sol.value.row_order.is_bijection());
            assert!(sol.value.col_order.is_bijection());
        }
    }

    #[test]
    fn upper_is_triangular() {
        let (a, b) = textbook();
        let sol = eliminate(&a, &b, PivotPolicy::Partial).unwrap().value;
        for i in 1..3 {
            for j in 0..i {
                assert_abs_diff_eq!(sol.upper[(i, j)], 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn scaled_prefers_relatively_large_pivot() {
        // Partial would pick row 1 (|30| > |5|), but relative to its row
        // 30/1e6 is tiny next to 5/6.
        let a = DynMatrix::from_rows(2, 2, &[30.0, 1_000_000.0, 5.0, 6.0]);
        let b = DynVector::from_slice(&[1_000_030.0, 11.0]);
        let sol = eliminate(&a, &b, PivotPolicy::Scaled).unwrap();
        assert_eq!(sol.value.row_order.as_slice(), &[1, 0]);
        assert_abs_diff_eq!(sol.value.x[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.value.x[1], 1.0, epsilon = 1e-9);

        let partial = eliminate(&a, &b, PivotPolicy::Partial).unwrap();
        assert_eq!(partial.value.row_order.as_slice(), &[0, 1]);
    }

    #[test]
    fn total_swaps_columns_and_unpermutes() {
        let a = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 10.0, 4.0, 1.0, 1.0, 1.0, 8.0, 2.0]);
        let x_true = DynVector::from_slice(&[1.0, -2.0, 3.0]);
        let b = &a * &x_true;
        let sol = eliminate(&a, &b, PivotPolicy::Total).unwrap();
        assert_eq!(sol.value.col_order.as_slice()[0], 2);
        assert!(sol.trail.contains("Swap C1 ↔ C3"));
        for i in 0..3 {
            assert_abs_diff_eq!(sol.value.x[i], x_true[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn singular_fails_for_every_policy() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DynVector::from_slice(&[3.0, 6.0]);
        for policy in PivotPolicy::ALL {
            let err = eliminate(&a, &b, policy).unwrap_err();
            assert!(matches!(err.error, LinalgError::Singular { .. }), "{}", policy);
            assert!(!err.trail.is_empty());
        }
    }

    #[test]
    fn zero_column_fails_early() {
        let a = DynMatrix::from_rows(3, 3, &[0.0, 1.0, 2.0, 0.0, 3.0, 4.0, 0.0, 5.0, 7.0]);
        let b = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        let err = eliminate(&a, &b, PivotPolicy::Partial).unwrap_err();
        assert_eq!(err.error, LinalgError::Singular { step: 0 });
    }

    #[test]
    fn dimension_mismatch_is_input_error() {
        let a = DynMatrix::eye(3, 0.0_f64);
        let b = DynVector::from_slice(&[1.0, 2.0]);
        let err = eliminate(&a, &b, PivotPolicy::Partial).unwrap_err();
        assert_eq!(err.error, LinalgError::DimensionMismatch { expected: 3, got: 2 });

        let rect = DynMatrix::zeros(2, 3, 0.0_f64);
        let err = eliminate(&rect, &b, PivotPolicy::Partial).unwrap_err();
        assert_eq!(err.error, LinalgError::NotSquare { nrows: 2, ncols: 3 });
    }

    #[test]
    fn inputs_are_not_mutated() {
        let (a, b) = textbook();
        let (a0, b0) = (a.clone(), b.clone());
        let _ = eliminate(&a, &b, PivotPolicy::Total).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn one_by_one() {
        let a = DynMatrix::from_rows(1, 1, &[4.0]);
        let b = DynVector::from_slice(&[2.0]);
        let x = a.solve_gauss(&b, PivotPolicy::Total).unwrap();
        assert_eq!(x.as_slice(), &[0.5]);

        let zero = DynMatrix::from_rows(1, 1, &[0.0]);
        assert_eq!(
            zero.solve_gauss(&b, PivotPolicy::Partial).unwrap_err(),
            LinalgError::Singular { step: 0 }
        );
    }

    #[test]
    fn f32_uses_its_own_tolerance() {
        let a = DynMatrix::from_rows(2, 2, &[2.0_f32, 1.0, 1.0, 3.0]);
        let b = DynVector::from_slice(&[3.0_f32, 5.0]);
        let x = a.solve_gauss(&b, PivotPolicy::Partial).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-5);
        assert!((x[1] - 1.4).abs() < 1e-5);
    }

    #[test]
    fn nan_pivot_is_singular() {
        let b = DynVector::from_slice(&[1.0, 1.0]);
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, f64::NAN]);
        for policy in PivotPolicy::ALL {
            let err = eliminate(&a, &b, policy).unwrap_err();
            assert!(matches!(err.error, LinalgError::Singular { .. }), "{}", policy);
        }

        let nan = DynMatrix::from_rows(1, 1, &[f64::NAN]);
        assert_eq!(
            nan.solve_gauss(&DynVector::from_slice(&[1.0]), PivotPolicy::Partial)
                .unwrap_err(),
            LinalgError::Singular { step: 0 }
        );
    }
}
