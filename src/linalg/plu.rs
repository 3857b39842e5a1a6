use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::lu::substitute_pair;
use crate::linalg::{
    check_rhs, check_square, negligible, LinalgError, SolverSettings, Traced, TracedError,
};
use crate::permutation::Permutation;
use crate::traits::FloatScalar;

/// Factors `P·A = L·U` from elimination with partial pivoting.
#[derive(Debug, Clone, PartialEq)]
pub struct PluFactors<T> {
    /// Permutation matrix, `P·Pᵀ = I`.
    pub p: DynMatrix<T>,
    /// The same row permutation as an index record: `P = perm.to_matrix()`.
    pub perm: Permutation,
    pub l: DynMatrix<T>,
    pub u: DynMatrix<T>,
}

impl<T: FloatScalar> PluFactors<T> {
    /// `Pᵀ·L·U`, which reproduces `A`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.p.transpose() * &(&self.l * &self.u)
    }

    /// Solve `A·x = b` with these factors.
    pub fn solve(&self, b: &DynVector<T>) -> Result<Traced<DynVector<T>>, TracedError>
    where
        SolverSettings<T>: Default,
    {
        solve_plu(&self.p, &self.l, &self.u, b)
    }

    /// [`solve`](Self::solve) with explicit settings.
    pub fn solve_with(
        &self,
        b: &DynVector<T>,
        settings: &SolverSettings<T>,
    ) -> Result<Traced<DynVector<T>>, TracedError> {
        solve_plu_with(&self.p, &self.l, &self.u, b, settings)
    }
}

/// PLU factorization with partial pivoting, with default settings.
///
/// Row swaps are applied to `U` and `P` in lockstep; the multipliers already
/// stored in columns `< k` of `L` travel with their rows, so `P·A = L·U`
/// holds after every step, not only at the end.
///
/// # Example
///
/// ```
/// use gauss_linsys::{factorize_plu, DynMatrix};
///
/// // Naive LU fails here: the leading pivot is zero.
/// let a = DynMatrix::from_rows(2, 2, &[0.0_f64, 1.0, 2.0, 3.0]);
/// let plu = factorize_plu(&a).unwrap().value;
/// let pa = &plu.p * &a;
/// let lu = &plu.l * &plu.u;
/// assert!(pa.max_abs_diff(&lu) < 1e-12);
/// ```
pub fn factorize_plu<T: FloatScalar>(a: &DynMatrix<T>) -> Result<Traced<PluFactors<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    factorize_plu_with(a, &SolverSettings::default())
}

/// [`factorize_plu`] with explicit settings.
pub fn factorize_plu_with<T: FloatScalar>(
    a: &DynMatrix<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<PluFactors<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("PLU FACTORIZATION (PARTIAL PIVOTING)");
    trail.push("P·A = L·U  where P⁻¹ = Pᵀ");
    let n = check_square(a, &trail)?;
    trail.matrix("Original matrix A", a);

    let mut p = DynMatrix::eye(n, T::zero());
    let mut perm = Permutation::identity(n);
    let mut l = DynMatrix::eye(n, T::zero());
    let mut u = a.clone();

    for k in 0..n {
        if k + 1 < n {
            trail.section(&format!("Iteration {}", k + 1));
        }

        let mut max_row = k;
        let mut max_val = u[(k, k)].abs();
        for i in (k + 1)..n {
            let val = u[(i, k)].abs();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        if max_row != k {
            log::debug!("PLU step {}: swap rows {} and {}", k + 1, k + 1, max_row + 1);
            trail.push(format!(
                "Largest pivot: {} in row {}; swap R{} ↔ R{}",
                trail.num(max_val),
                max_row + 1,
                k + 1,
                max_row + 1
            ));
            u.swap_rows(k, max_row);
            p.swap_rows(k, max_row);
            perm.swap(k, max_row);
            l.swap_rows_prefix(k, max_row, k);
        }

        let pivot = u[(k, k)];
        if negligible(pivot, settings.pivot_tol) {
            trail.push(format!("Pivot u[{},{}] = {} is near zero", k + 1, k + 1, trail.num(pivot)));
            return Err(TracedError::new(LinalgError::Singular { step: k }, trail));
        }

        for i in (k + 1)..n {
            let factor = u[(i, k)] / pivot;
            l[(i, k)] = factor;
            for j in k..n {
                u[(i, j)] = u[(i, j)] - factor * u[(k, j)];
            }
            trail.push(format!("  m_{} = {}", i + 1, trail.num(factor)));
        }
    }

    let factors = PluFactors { p, perm, l, u };

    trail.banner("FACTORIZATION RESULT");
    trail.matrix("P (permutation matrix)", &factors.p);
    trail.push(format!("Row order: {}", factors.perm));
    trail.matrix("L", &factors.l);
    trail.matrix("U", &factors.u);
    trail.section("Check: P·A = L·U");
    trail.matrix("P·A", &(&factors.p * a));
    trail.matrix("L·U", &(&factors.l * &factors.u));
    log::trace!("PLU factorization of a {}x{} matrix complete", n, n);

    Ok(Traced {
        value: factors,
        trail,
    })
}

/// Solve `A·x = b` from `P·A = L·U`: permute `b' = P·b`, then `L·y = b'`,
/// then `U·x = y`.
pub fn solve_plu<T: FloatScalar>(
    p: &DynMatrix<T>,
    l: &DynMatrix<T>,
    u: &DynMatrix<T>,
    b: &DynVector<T>,
) -> Result<Traced<DynVector<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    solve_plu_with(p, l, u, b, &SolverSettings::default())
}

/// [`solve_plu`] with explicit settings.
pub fn solve_plu_with<T: FloatScalar>(
    p: &DynMatrix<T>,
    l: &DynMatrix<T>,
    u: &DynMatrix<T>,
    b: &DynVector<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<DynVector<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("SOLVE WITH PLU");
    let n = check_square(l, &trail)?;
    check_square(p, &trail)?;
    check_square(u, &trail)?;
    check_rhs(n, p.nrows(), &trail)?;
    check_rhs(n, u.nrows(), &trail)?;
    check_rhs(n, b.len(), &trail)?;

    let pb = p * b;
    trail.vector("b (original)", b.as_slice());
    trail.vector("P·b (permuted)", pb.as_slice());

    let x = substitute_pair(l, u, pb.as_slice(), &mut trail);

    Ok(Traced {
        value: DynVector::from_vec(x),
        trail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn check_pa_eq_lu(a: &DynMatrix<f64>, f: &PluFactors<f64>) {
        let pa = &f.p * a;
        let lu = &f.l * &f.u;
        assert!(pa.max_abs_diff(&lu) < 1e-10, "P·A != L·U");
    }

    #[test]
    fn zero_leading_pivot() {
        let a = DynMatrix::from_rows(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let f = factorize_plu(&a).unwrap().value;
        check_pa_eq_lu(&a, &f);
        assert!(f.reconstruct().max_abs_diff(&a) < 1e-10);
    }

    #[test]
    fn l_rows_follow_later_swaps() {
        // Second-step swap exercises the L[.., <k] exchange.
        let a = DynMatrix::from_rows(
            4,
            4,
            &[
                2.0, 1.0, 1.0, 0.0, //
                4.0, 3.0, 3.0, 1.0, //
                8.0, 7.0, 9.0, 5.0, //
                6.0, 7.0, 9.0, 8.0,
            ],
        );
        let f = factorize_plu(&a).unwrap().value;
        check_pa_eq_lu(&a, &f);
        for i in 0..4 {
            assert_eq!(f.l[(i, i)], 1.0);
            for j in 0..i {
                assert!(f.l[(i, j)].abs() <= 1.0 + 1e-12, "partial pivoting bounds |l_ij| by 1");
            }
        }
    }

    #[test]
    fn permutation_matrix_matches_record() {
        let a = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0]);
        let f = factorize_plu(&a).unwrap().value;
        assert!(f.perm.is_bijection());
        assert_eq!(f.perm.to_matrix::<f64>(), f.p);
        let ppt = &f.p * &f.p.transpose();
        assert_eq!(ppt, DynMatrix::eye(3, 0.0));
    }

    #[test]
    fn singular_fails() {
        let a = DynMatrix::from_rows(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let err = factorize_plu(&a).unwrap_err();
        assert!(matches!(err.error, LinalgError::Singular { .. }));
    }

    #[test]
    fn solve_permutes_rhs() {
        let a = DynMatrix::from_rows(2, 2, &[0.0, 1.0, 2.0, 3.0]);
        let b = DynVector::from_slice(&[4.0, 13.0]);
        let f = factorize_plu(&a).unwrap().value;
        let sol = f.solve(&b).unwrap();
        assert_abs_diff_eq!(sol.value[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.value[1], 4.0, epsilon = 1e-12);
        assert!(sol.trail.contains("P·b (permuted) = [13.000000, 4.000000]"));
    }

    #[test]
    fn solve_with_settings_precision() {
        let a = DynMatrix::from_rows(2, 2, &[0.0, 1.0, 2.0, 3.0]);
        let settings = SolverSettings::default().with_precision(1);
        let f = factorize_plu_with(&a, &settings).unwrap().value;
        let sol = f.solve_with(&DynVector::from_slice(&[4.0, 13.0]), &settings).unwrap();
        assert_eq!(sol.trail.precision(), 1);
        assert!(sol.trail.contains("x = [0.5, 4.0]"));
    }

    #[test]
    fn nan_entry_is_singular() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, f64::NAN]);
        let err = factorize_plu(&a).unwrap_err();
        assert_eq!(err.error, LinalgError::Singular { step: 1 });
    }
}
