use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::substitution::{back_substitute, forward_substitute_unit};
use crate::linalg::{
    check_rhs, check_square, negligible, LinalgError, SolverSettings, Traced, TracedError,
};
use crate::trail::Trail;
use crate::traits::FloatScalar;

/// Doolittle factors `A = L·U`: `L` unit lower triangular, `U` upper triangular.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactors<T> {
    pub l: DynMatrix<T>,
    pub u: DynMatrix<T>,
}

impl<T: FloatScalar> LuFactors<T> {
    /// `L·U`, which reproduces `A`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.l * &self.u
    }

    /// Solve `A·x = b` with these factors.
    pub fn solve(&self, b: &DynVector<T>) -> Result<Traced<DynVector<T>>, TracedError>
    where
        SolverSettings<T>: Default,
    {
        solve_lu(&self.l, &self.u, b)
    }

    /// [`solve`](Self::solve) with explicit settings.
    pub fn solve_with(
        &self,
        b: &DynVector<T>,
        settings: &SolverSettings<T>,
    ) -> Result<Traced<DynVector<T>>, TracedError> {
        solve_lu_with(&self.l, &self.u, b, settings)
    }
}

/// LU factorization without pivoting (Doolittle), with default settings.
///
/// Multipliers `m = u_ik / u_kk` are stored with positive sign in `L`: they
/// are the entries of the inverse of each elementary elimination matrix.
///
/// # Errors
///
/// [`LinalgError::ZeroPivot`] if any `u_kk` falls below the pivot tolerance;
/// the caller is expected to switch to [`factorize_plu`](crate::factorize_plu).
///
/// # Example
///
/// ```
/// use gauss_linsys::{factorize_lu, DynMatrix};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
/// let lu = factorize_lu(&a).unwrap().value;
/// assert_eq!(lu.l[(1, 0)], 1.5);
/// assert_eq!(lu.u[(1, 1)], -1.5);
/// assert!(lu.reconstruct().max_abs_diff(&a) < 1e-12);
/// ```
pub fn factorize_lu<T: FloatScalar>(a: &DynMatrix<T>) -> Result<Traced<LuFactors<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    factorize_lu_with(a, &SolverSettings::default())
}

/// [`factorize_lu`] with explicit settings.
pub fn factorize_lu_with<T: FloatScalar>(
    a: &DynMatrix<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<LuFactors<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("LU FACTORIZATION (DOOLITTLE)");
    let n = check_square(a, &trail)?;

    trail.matrix("Original matrix A", a);
    trail.push("M·A = U  ⇒  A = M⁻¹·U = L·U");
    trail.push("Each elementary matrix M holds -m at (i,k); its inverse holds +m, which goes into L");

    let mut l = DynMatrix::eye(n, T::zero());
    let mut u = a.clone();

    for k in 0..n {
        let pivot = u[(k, k)];
        if negligible(pivot, settings.pivot_tol) {
            trail.push(format!("Pivot u[{},{}] = {} is near zero", k + 1, k + 1, trail.num(pivot)));
            return Err(TracedError::new(LinalgError::ZeroPivot { step: k }, trail));
        }
        if k + 1 == n {
            break;
        }

        trail.section(&format!("Iteration {}: column {}", k + 1, k + 1));
        for i in (k + 1)..n {
            let factor = u[(i, k)] / pivot;
            l[(i, k)] = factor;
            trail.push(format!(
                "  m_{i1} = u[{i1},{k1}]/u[{k1},{k1}] = {}/{} = {}  →  L[{i1},{k1}] = +{}",
                trail.num(u[(i, k)]),
                trail.num(pivot),
                trail.num(factor),
                trail.num(factor),
                i1 = i + 1,
                k1 = k + 1,
            ));
            trail.push(format!("  R{} ← R{} - ({})·R{}", i + 1, i + 1, trail.num(factor), k + 1));
            for j in k..n {
                u[(i, j)] = u[(i, j)] - factor * u[(k, j)];
            }
        }
        trail.matrix("Partial U", &u);
    }

    let factors = LuFactors { l, u };

    trail.banner("FACTORIZATION RESULT");
    trail.matrix("L (unit lower triangular)", &factors.l);
    trail.matrix("U (upper triangular)", &factors.u);
    trail.section("Check: L·U = A");
    trail.matrix("L·U", &factors.reconstruct());
    log::trace!("LU factorization of a {}x{} matrix complete", n, n);

    Ok(Traced {
        value: factors,
        trail,
    })
}

/// Solve `A·x = b` from Doolittle factors: `L·y = b`, then `U·x = y`.
///
/// Factors are trusted; only the dimensions are validated.
///
/// ```
/// use gauss_linsys::{factorize_lu, solve_lu, DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
/// let lu = factorize_lu(&a).unwrap().value;
/// let x = solve_lu(&lu.l, &lu.u, &DynVector::from_slice(&[10.0, 12.0])).unwrap().value;
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_lu<T: FloatScalar>(
    l: &DynMatrix<T>,
    u: &DynMatrix<T>,
    b: &DynVector<T>,
) -> Result<Traced<DynVector<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    solve_lu_with(l, u, b, &SolverSettings::default())
}

/// [`solve_lu`] with explicit settings.
pub fn solve_lu_with<T: FloatScalar>(
    l: &DynMatrix<T>,
    u: &DynMatrix<T>,
    b: &DynVector<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<DynVector<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("SOLVE WITH LU");
    let n = check_square(l, &trail)?;
    check_square(u, &trail)?;
    check_rhs(n, u.nrows(), &trail)?;
    check_rhs(n, b.len(), &trail)?;
    trail.vector("b", b.as_slice());

    let x = substitute_pair(l, u, b.as_slice(), &mut trail);

    Ok(Traced {
        value: DynVector::from_vec(x),
        trail,
    })
}

/// The forward/back pair shared by LU and PLU.
pub(crate) fn substitute_pair<T: FloatScalar>(
    l: &DynMatrix<T>,
    u: &DynMatrix<T>,
    b: &[T],
    trail: &mut Trail,
) -> Vec<T> {
    trail.section("Step 1: solve L·y = b (forward substitution)");
    let y = forward_substitute_unit(l, b, ("y", "b"), trail);
    trail.vector("y", &y);

    trail.section("Step 2: solve U·x = y (back substitution)");
    let x = back_substitute(u, &y, ("x", "y"), trail);

    trail.banner("SOLUTION");
    trail.vector("x", &x);
    x
}
