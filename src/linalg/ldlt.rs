use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::substitution::{back_substitute, forward_substitute_unit};
use crate::linalg::{
    check_rhs, check_square, negligible, warn_if_asymmetric, LinalgError, SolverSettings, Traced,
    TracedError,
};
use crate::traits::{FloatScalar, Transposed};

/// Factors `A = L·D·Lᵀ`: `L` unit lower triangular, `D` diagonal (stored as a vector).
///
/// Unlike Cholesky, entries of `D` may be negative, so symmetric indefinite
/// matrices factor as long as no `d_j` vanishes.
#[derive(Debug, Clone, PartialEq)]
pub struct LdltFactors<T> {
    pub l: DynMatrix<T>,
    pub d: DynVector<T>,
}

impl<T: FloatScalar> LdltFactors<T> {
    /// `L·D·Lᵀ`, which reproduces `A`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        let ld = &self.l * &DynMatrix::from_diag(&self.d);
        &ld * &self.l.transpose()
    }

    /// Solve `A·x = b` with these factors.
    pub fn solve(&self, b: &DynVector<T>) -> Result<Traced<DynVector<T>>, TracedError>
    where
        SolverSettings<T>: Default,
    {
        solve_ldlt(&self.l, &self.d, b)
    }

    /// [`solve`](Self::solve) with explicit settings.
    pub fn solve_with(
        &self,
        b: &DynVector<T>,
        settings: &SolverSettings<T>,
    ) -> Result<Traced<DynVector<T>>, TracedError> {
        solve_ldlt_with(&self.l, &self.d, b, settings)
    }
}

/// LDLᵀ factorization, with default settings.
///
/// ```text
/// d_j  = a_jj - Σ_{k<j} l_jk²·d_k
/// l_ij = (a_ij - Σ_{k<j} l_ik·l_jk·d_k) / d_j      i > j
/// ```
///
/// Only the lower triangle of `a` is read; asymmetric input draws a warning.
///
/// # Errors
///
/// [`LinalgError::ZeroDiagonal`] if some `|d_j|` is below the pivot tolerance
/// or NaN.
///
/// # Example
///
/// ```
/// use gauss_linsys::{factorize_ldlt, DynMatrix};
///
/// // Symmetric but indefinite: Cholesky rejects it, LDLᵀ does not.
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 1.0]);
/// let f = factorize_ldlt(&a).unwrap().value;
/// assert_eq!(f.d.as_slice(), &[1.0, -3.0]);
/// assert_eq!(f.l[(1, 0)], 2.0);
/// ```
pub fn factorize_ldlt<T: FloatScalar>(a: &DynMatrix<T>) -> Result<Traced<LdltFactors<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    factorize_ldlt_with(a, &SolverSettings::default())
}

/// [`factorize_ldlt`] with explicit settings.
pub fn factorize_ldlt_with<T: FloatScalar>(
    a: &DynMatrix<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<LdltFactors<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("LDLᵀ FACTORIZATION");
    trail.push("A = L·D·Lᵀ  (A symmetric)");
    let n = check_square(a, &trail)?;
    warn_if_asymmetric(a, settings, &mut trail);
    trail.matrix("Original matrix A", a);
    trail.push("  d_j  = a_jj - Σ l_jk²·d_k");
    trail.push("  l_ij = (a_ij - Σ l_ik·l_jk·d_k) / d_j");

    let mut l = DynMatrix::eye(n, T::zero());
    let mut d = DynVector::zeros(n, T::zero());

    for j in 0..n {
        trail.section(&format!("Column {}", j + 1));

        let mut sum = T::zero();
        for k in 0..j {
            sum = sum + l[(j, k)] * l[(j, k)] * d[k];
        }
        d[j] = a[(j, j)] - sum;
        trail.push(format!(
            "d_{j1} = a_{j1}{j1} - Σ(l²·d) = {} - {} = {}",
            trail.num(a[(j, j)]),
            trail.num(sum),
            trail.num(d[j]),
            j1 = j + 1,
        ));

        if negligible(d[j], settings.pivot_tol) {
            return Err(TracedError::new(LinalgError::ZeroDiagonal { column: j }, trail));
        }

        for i in (j + 1)..n {
            let mut sum = T::zero();
            for k in 0..j {
                sum = sum + l[(i, k)] * l[(j, k)] * d[k];
            }
            l[(i, j)] = (a[(i, j)] - sum) / d[j];
            trail.push(format!(
                "l_{}{} = ({} - {}) / {} = {}",
                i + 1,
                j + 1,
                trail.num(a[(i, j)]),
                trail.num(sum),
                trail.num(d[j]),
                trail.num(l[(i, j)]),
            ));
        }
    }

    let factors = LdltFactors { l, d };

    trail.banner("FACTORIZATION RESULT");
    trail.matrix("L (unit lower triangular)", &factors.l);
    trail.vector("D (diagonal)", factors.d.as_slice());
    trail.matrix("Lᵀ", &factors.l.transpose());
    trail.section("Check: L·D·Lᵀ = A");
    trail.matrix("L·D·Lᵀ", &factors.reconstruct());
    log::trace!("LDLᵀ factorization of a {}x{} matrix complete", n, n);

    Ok(Traced {
        value: factors,
        trail,
    })
}

/// Solve `A·x = b` from LDLᵀ factors: `L·y = b`, `z = y / d`, then `Lᵀ·x = z`.
pub fn solve_ldlt<T: FloatScalar>(
    l: &DynMatrix<T>,
    d: &DynVector<T>,
    b: &DynVector<T>,
) -> Result<Traced<DynVector<T>>, TracedError>
where
    SolverSettings<T>: Default,
{
    solve_ldlt_with(l, d, b, &SolverSettings::default())
}

/// [`solve_ldlt`] with explicit settings.
pub fn solve_ldlt_with<T: FloatScalar>(
    l: &DynMatrix<T>,
    d: &DynVector<T>,
    b: &DynVector<T>,
    settings: &SolverSettings<T>,
) -> Result<Traced<DynVector<T>>, TracedError> {
    let mut trail = settings.trail();
    trail.banner("SOLVE WITH LDLᵀ");
    let n = check_square(l, &trail)?;
    check_rhs(n, d.len(), &trail)?;
    check_rhs(n, b.len(), &trail)?;
    trail.vector("b", b.as_slice());

    trail.section("Step 1: solve L·y = b (forward substitution)");
    let y = forward_substitute_unit(l, b.as_slice(), ("y", "b"), &mut trail);
    trail.vector("y", &y);

    trail.section("Step 2: solve D·z = y");
    let z: Vec<T> = y.iter().zip(d.as_slice()).map(|(&yi, &di)| yi / di).collect();
    trail.vector("z", &z);

    trail.section("Step 3: solve Lᵀ·x = z (back substitution)");
    let x = back_substitute(&Transposed(l), &z, ("x", "z"), &mut trail);

    trail.banner("SOLUTION");
    trail.vector("x", &x);

    Ok(Traced {
        value: DynVector::from_vec(x),
        trail,
    })
}
