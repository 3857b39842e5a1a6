use core::fmt;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::{
    factorize_cholesky_with, factorize_ldlt_with, factorize_lu_with, factorize_plu_with,
    CholeskyFactors, LdltFactors, LinalgError, LuFactors, PluFactors, SolverSettings, Traced,
    TracedError,
};
use crate::traits::FloatScalar;

/// Which decomposition to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    Lu,
    Plu,
    Cholesky,
    Ldlt,
}

impl FactorKind {
    pub const ALL: [FactorKind; 4] = [
        FactorKind::Lu,
        FactorKind::Plu,
        FactorKind::Cholesky,
        FactorKind::Ldlt,
    ];
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorKind::Lu => write!(f, "LU (Doolittle)"),
            FactorKind::Plu => write!(f, "PLU"),
            FactorKind::Cholesky => write!(f, "Cholesky"),
            FactorKind::Ldlt => write!(f, "LDLᵀ"),
        }
    }
}

/// A computed decomposition, tagged by kind.
///
/// ```
/// use gauss_linsys::{DynMatrix, DynVector, FactorKind, Factorization};
///
/// let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 5.0]);
/// let b = DynVector::from_slice(&[6.0, 7.0]);
/// for kind in FactorKind::ALL {
///     let f = Factorization::factorize(&a, kind).unwrap().value;
///     assert_eq!(f.kind(), kind);
///     let x = f.solve(&b).unwrap().value;
///     assert!((x[0] - 1.0).abs() < 1e-12);
///     assert!((x[1] - 1.0).abs() < 1e-12);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Factorization<T> {
    Lu(LuFactors<T>),
    Plu(PluFactors<T>),
    Cholesky(CholeskyFactors<T>),
    Ldlt(LdltFactors<T>),
}

impl<T: FloatScalar> Factorization<T> {
    pub fn kind(&self) -> FactorKind {
        match self {
            Factorization::Lu(_) => FactorKind::Lu,
            Factorization::Plu(_) => FactorKind::Plu,
            Factorization::Cholesky(_) => FactorKind::Cholesky,
            Factorization::Ldlt(_) => FactorKind::Ldlt,
        }
    }

    /// Factor `a` as `kind`, with default settings.
    pub fn factorize(a: &DynMatrix<T>, kind: FactorKind) -> Result<Traced<Self>, TracedError>
    where
        SolverSettings<T>: Default,
    {
        Self::factorize_with(a, kind, &SolverSettings::default())
    }

    /// [`factorize`](Self::factorize) with explicit settings.
    pub fn factorize_with(
        a: &DynMatrix<T>,
        kind: FactorKind,
        settings: &SolverSettings<T>,
    ) -> Result<Traced<Self>, TracedError> {
        Ok(match kind {
            FactorKind::Lu => factorize_lu_with(a, settings)?.map(Factorization::Lu),
            FactorKind::Plu => factorize_plu_with(a, settings)?.map(Factorization::Plu),
            FactorKind::Cholesky => {
                factorize_cholesky_with(a, settings)?.map(Factorization::Cholesky)
            }
            FactorKind::Ldlt => factorize_ldlt_with(a, settings)?.map(Factorization::Ldlt),
        })
    }

    /// Solve `A·x = b` with the substitution sequence matching the kind.
    pub fn solve(&self, b: &DynVector<T>) -> Result<Traced<DynVector<T>>, TracedError>
    where
        SolverSettings<T>: Default,
    {
        self.solve_with(b, &SolverSettings::default())
    }

    /// [`solve`](Self::solve) with explicit settings; the trail uses
    /// `settings.precision`.
    pub fn solve_with(
        &self,
        b: &DynVector<T>,
        settings: &SolverSettings<T>,
    ) -> Result<Traced<DynVector<T>>, TracedError> {
        match self {
            Factorization::Lu(f) => f.solve_with(b, settings),
            Factorization::Plu(f) => f.solve_with(b, settings),
            Factorization::Cholesky(f) => f.solve_with(b, settings),
            Factorization::Ldlt(f) => f.solve_with(b, settings),
        }
    }

    /// The product of the factors, which approximates the original `A`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        match self {
            Factorization::Lu(f) => f.reconstruct(),
            Factorization::Plu(f) => f.reconstruct(),
            Factorization::Cholesky(f) => f.reconstruct(),
            Factorization::Ldlt(f) => f.reconstruct(),
        }
    }
}

/// Convenience methods on matrices.
impl<T: FloatScalar> DynMatrix<T>
where
    SolverSettings<T>: Default,
{
    /// Doolittle LU factorization, discarding the audit trail.
    pub fn lu_doolittle(&self) -> Result<LuFactors<T>, LinalgError> {
        Ok(crate::linalg::factorize_lu(self)?.value)
    }

    /// PLU factorization, discarding the audit trail.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[0.0_f64, 1.0, 1.0, 1.0]);
    /// assert!(a.lu_doolittle().is_err());
    /// let plu = a.plu().unwrap();
    /// assert!(plu.reconstruct().max_abs_diff(&a) < 1e-12);
    /// ```
    pub fn plu(&self) -> Result<PluFactors<T>, LinalgError> {
        Ok(crate::linalg::factorize_plu(self)?.value)
    }

    /// Cholesky factorization, discarding the audit trail.
    pub fn cholesky(&self) -> Result<CholeskyFactors<T>, LinalgError> {
        Ok(crate::linalg::factorize_cholesky(self)?.value)
    }

    /// LDLᵀ factorization, discarding the audit trail.
    pub fn ldlt(&self) -> Result<LdltFactors<T>, LinalgError> {
        Ok(crate::linalg::factorize_ldlt(self)?.value)
    }
}
