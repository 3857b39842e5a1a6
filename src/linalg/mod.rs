pub(crate) mod cholesky;
pub(crate) mod elimination;
pub(crate) mod factorization;
pub(crate) mod ldlt;
pub(crate) mod lu;
pub(crate) mod plu;
pub(crate) mod substitution;

pub use cholesky::{
    factorize_cholesky, factorize_cholesky_with, solve_cholesky, solve_cholesky_with, CholeskyFactors,
};
pub use elimination::{eliminate, eliminate_with, Elimination, PivotPolicy};
pub use factorization::{FactorKind, Factorization};
pub use ldlt::{factorize_ldlt, factorize_ldlt_with, solve_ldlt, solve_ldlt_with, LdltFactors};
pub use lu::{factorize_lu, factorize_lu_with, solve_lu, solve_lu_with, LuFactors};
pub use plu::{factorize_plu, factorize_plu_with, solve_plu, solve_plu_with, PluFactors};

use thiserror::Error;

use crate::dynmatrix::DynMatrix;
use crate::trail::Trail;
use crate::traits::FloatScalar;

/// Errors from linear-system solves and factorizations.
///
/// ```
/// use gauss_linsys::{eliminate, DynMatrix, DynVector, LinalgError, PivotPolicy};
///
/// let singular = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// let b = DynVector::from_slice(&[1.0, 2.0]);
/// let err = eliminate(&singular, &b, PivotPolicy::Partial).unwrap_err();
/// assert_eq!(err.error, LinalgError::Singular { step: 1 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// The best available pivot at elimination step `step` is below tolerance.
    #[error("singular or ill-conditioned system: pivot below tolerance at step {}", .step + 1)]
    Singular { step: usize },
    /// Doolittle LU hit a (near) zero pivot; it never pivots on its own.
    #[error("zero pivot at step {}: factor with partial pivoting (PLU) instead", .step + 1)]
    ZeroPivot { step: usize },
    /// Cholesky radicand `a_ii - Σ l_ik²` was `<= 0`.
    #[error("matrix is not positive definite: non-positive radicand in column {}", .column + 1)]
    NotPositiveDefinite { column: usize },
    /// LDLᵀ diagonal entry `d_j` is (near) zero.
    #[error("zero pivot d_{} in LDLᵀ factorization", .column + 1)]
    ZeroDiagonal { column: usize },
    #[error("matrix must be square, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },
    #[error("dimension mismatch: expected length {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl LinalgError {
    /// Input errors are raised before any arithmetic; the rest are numeric.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LinalgError::NotSquare { .. } | LinalgError::DimensionMismatch { .. }
        )
    }
}

/// A failure plus the audit trail accumulated up to the point of failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct TracedError {
    #[source]
    pub error: LinalgError,
    pub trail: Trail,
}

impl TracedError {
    pub(crate) fn new(error: LinalgError, mut trail: Trail) -> Self {
        log::debug!("linear solve failed: {}", error);
        trail.push(format!("ERROR: {}", error));
        Self { error, trail }
    }
}

impl From<TracedError> for LinalgError {
    fn from(e: TracedError) -> Self {
        e.error
    }
}

/// A computed value alongside the audit trail that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Traced<V> {
    pub value: V,
    pub trail: Trail,
}

impl<V> Traced<V> {
    /// Drop the trail.
    pub fn into_value(self) -> V {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Traced<U> {
        Traced {
            value: f(self.value),
            trail: self.trail,
        }
    }
}

/// Settings shared by elimination, factorization and solve routines.
#[derive(Debug, Clone, Copy)]
pub struct SolverSettings<T> {
    /// Pivots (and LDLᵀ diagonal entries) with magnitude below this fail.
    pub pivot_tol: T,
    /// Decimal places used when writing numbers to the audit trail.
    pub precision: usize,
    /// Relative tolerance of the advisory symmetry check.
    pub symmetry_rtol: T,
    /// Absolute tolerance of the advisory symmetry check.
    pub symmetry_atol: T,
}

impl Default for SolverSettings<f64> {
    fn default() -> Self {
        Self {
            pivot_tol: 1e-12,
            precision: 6,
            symmetry_rtol: 1e-5,
            symmetry_atol: 1e-8,
        }
    }
}

impl Default for SolverSettings<f32> {
    fn default() -> Self {
        Self {
            pivot_tol: 1e-6,
            precision: 6,
            symmetry_rtol: 1e-5,
            symmetry_atol: 1e-6,
        }
    }
}

impl<T> SolverSettings<T> {
    pub fn with_pivot_tol(mut self, pivot_tol: T) -> Self {
        self.pivot_tol = pivot_tol;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub(crate) fn trail(&self) -> Trail {
        Trail::new(self.precision)
    }
}

/// Whether a pivot is too small to divide by. NaN counts as negligible.
pub(crate) fn negligible<T: FloatScalar>(pivot: T, tol: T) -> bool {
    pivot.is_nan() || pivot.abs() < tol
}

/// Reject non-square `a`, returning `n`.
pub(crate) fn check_square<T>(a: &DynMatrix<T>, trail: &Trail) -> Result<usize, TracedError> {
    if !a.is_square() {
        return Err(TracedError::new(
            LinalgError::NotSquare {
                nrows: a.nrows(),
                ncols: a.ncols(),
            },
            trail.clone(),
        ));
    }
    Ok(a.nrows())
}

/// Reject a right-hand side whose length differs from `n`.
pub(crate) fn check_rhs(n: usize, len: usize, trail: &Trail) -> Result<(), TracedError> {
    if len != n {
        return Err(TracedError::new(
            LinalgError::DimensionMismatch {
                expected: n,
                got: len,
            },
            trail.clone(),
        ));
    }
    Ok(())
}

/// Advisory symmetry check for Cholesky/LDLᵀ: warns, never fails.
pub(crate) fn warn_if_asymmetric<T: FloatScalar>(
    a: &DynMatrix<T>,
    settings: &SolverSettings<T>,
    trail: &mut Trail,
) {
    if !a.is_symmetric_approx(settings.symmetry_rtol, settings.symmetry_atol) {
        log::warn!("factorizing a matrix that is not symmetric; only its lower triangle is used");
        trail.push("WARNING: the matrix is not symmetric");
    }
}
