use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::substitution::{back_substitute, forward_substitute};
use crate::linalg::{
    check_rhs, check_square, warn_if_asymmetric, LinalgError, SolverSettings, Traced, TracedError,
};
use crate::traits::{FloatScalar, Transposed};

/// Cholesky factor `A = L·Lᵀ`, `L` lower triangular with a positive diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactors<T> {
    pub l: DynMatrix<T>,
}

impl<T: FloatScalar> CholeskyFactors<T> {
    /// `L·Lᵀ`, which reproduces `A`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        &self.l * &self.l.transpose()
    }

    /// Solve `A·x = b` with this factor.
    pub fn solve(&self, b: &DynVector<T>) -> Result<Traced<DynVector<T>>, TracedError>
    where
        SolverSettings<T>: Default,
    {
        solve_cholesky(&self.l, b)
    }

    /// [`solve`](Self::solve) with explicit settings.
    pub fn solve_with(
        &self,
        b: &DynVector<T>,
        settings: &SolverSettings<T>,
    ) -> Result<Traced<DynVector<T>>, TracedError> {
        solve_cholesky_with(&self.l, b, settings)
    }
}

/// Cholesky factorization, with default settings.
///
/// Only the lower triangle of `a` is read. Symmetry is checked but advisory:
/// an asymmetric input logs a warning and a trail line, then proceeds.
///
/// # Errors
///
/// [`LinalgError::NotPositiveDefinite`] if a radicand `a_jj - Σ l_jk²` is `<= 0`
/// or NaN.
///
/// # Example
///
/// ```
/// use gauss_linsys::{factorize_cholesky, DynMatrix};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 5.0]);
/// let chol = factorize_cholesky(&a).unwrap().value;
/// assert_eq!(chol.l[(0, 0)], 2.0);
/// assert_eq!(chol.l[(1, 0)], 1.0);
/// assert_eq!(chol.l[(1, 1)], 2.0);
/// ```
pub fn factorize_cholesky<T: FloatScalar>(
    a: &DynMatrix<T>,
) -> Result<Traced<CholeskyFactors<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    factorize_cholesky_with(a, &SolverSettings::default())
}

/// [`factorize_cholesky`] with explicit settings.
pub fn factorize_cholesky_with<T: FloatScalar>(
    a: &DynMatrix<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<CholeskyFactors<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("CHOLESKY FACTORIZATION");
    trail.push("A = L·Lᵀ  (A symmetric positive definite)");
    let n = check_square(a, &trail)?;
    warn_if_asymmetric(a, settings, &mut trail);
    trail.matrix("Original matrix A", a);

    let mut l = DynMatrix::zeros(n, n, T::zero());

    for j in 0..n {
        trail.section(&format!("Column {}", j + 1));

        let mut sum = T::zero();
        for k in 0..j {
            sum = sum + l[(j, k)] * l[(j, k)];
        }
        let radicand = a[(j, j)] - sum;
        if radicand.is_nan() || radicand <= T::zero() {
            trail.push(format!(
                "a_{j1}{j1} - Σ = {} - {} = {} <= 0",
                trail.num(a[(j, j)]),
                trail.num(sum),
                trail.num(radicand),
                j1 = j + 1,
            ));
            return Err(TracedError::new(
                LinalgError::NotPositiveDefinite { column: j },
                trail,
            ));
        }
        let ljj = radicand.sqrt();
        l[(j, j)] = ljj;
        trail.push(format!(
            "l_{j1}{j1} = √(a_{j1}{j1} - Σ l_{j1}k²) = √{} = {}",
            trail.num(radicand),
            trail.num(ljj),
            j1 = j + 1,
        ));

        for i in (j + 1)..n {
            let mut sum = T::zero();
            for k in 0..j {
                sum = sum + l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = (a[(i, j)] - sum) / ljj;
            trail.push(format!(
                "l_{i1}{j1} = (a_{i1}{j1} - Σ l_{i1}k·l_{j1}k) / l_{j1}{j1} = ({} - {}) / {} = {}",
                trail.num(a[(i, j)]),
                trail.num(sum),
                trail.num(ljj),
                trail.num(l[(i, j)]),
                i1 = i + 1,
                j1 = j + 1,
            ));
        }
    }

    let factors = CholeskyFactors { l };

    trail.banner("FACTORIZATION RESULT");
    trail.matrix("L", &factors.l);
    trail.matrix("Lᵀ", &factors.l.transpose());
    trail.section("Check: L·Lᵀ = A");
    trail.matrix("L·Lᵀ", &factors.reconstruct());
    log::trace!("Cholesky factorization of a {}x{} matrix complete", n, n);

    Ok(Traced {
        value: factors,
        trail,
    })
}

/// Solve `A·x = b` from a Cholesky factor: `L·y = b`, then `Lᵀ·x = y`.
///
/// ```
/// use gauss_linsys::{factorize_cholesky, solve_cholesky, DynMatrix, DynVector};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 5.0]);
/// let l = factorize_cholesky(&a).unwrap().value.l;
/// let x = solve_cholesky(&l, &DynVector::from_slice(&[6.0, 7.0])).unwrap().value;
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 1.0).abs() < 1e-12);
/// ```
pub fn solve_cholesky<T: FloatScalar>(
    l: &DynMatrix<T>,
    b: &DynVector<T>,
) -> Result<Traced<DynVector<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    solve_cholesky_with(l, b, &SolverSettings::default())
}

/// [`solve_cholesky`] with explicit settings.
pub fn solve_cholesky_with<T: FloatScalar>(
    l: &DynMatrix<T>,
    b: &DynVector<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<DynVector<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("SOLVE WITH CHOLESKY");
    let n = check_square(l, &trail)?;
    check_rhs(n, b.len(), &trail)?;
    trail.vector("b", b.as_slice());

    trail.section("Step 1: solve L·y = b (forward substitution)");
    let y = forward_substitute(l, b.as_slice(), ("y", "b"), &mut trail);
    trail.vector("y", &y);

    trail.section("Step 2: solve Lᵀ·x = y (back substitution)");
    let x = back_substitute(&Transposed(l), &y, ("x", "y"), &mut trail);

    trail.banner("SOLUTION");
    trail.vector("x", &x);

    Ok(Traced {
        value: DynVector::from_vec(x),
        trail,
    })
}
