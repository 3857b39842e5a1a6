use crate::traits::{FloatScalar, Scalar};

use super::vector::DynVector;
use super::DynMatrix;

impl<T: Scalar> DynMatrix<T> {
    /// Extract the diagonal as a `DynVector`.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let d = m.diag();
    /// assert_eq!(d[0], 1.0);
    /// assert_eq!(d[1], 4.0);
    /// ```
    pub fn diag(&self) -> DynVector<T> {
        let n = self.nrows.min(self.ncols);
        let mut data = Vec::with_capacity(n);
        for i in 0..n {
            data.push(self[(i, i)]);
        }
        DynVector::from_vec(data)
    }

    /// Create a square diagonal matrix from a vector.
    ///
    /// ```
    /// use gauss_linsys::{DynMatrix, DynVector};
    /// let v = DynVector::from_slice(&[2.0, 3.0]);
    /// let m = DynMatrix::from_diag(&v);
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(1, 1)], 3.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_diag(v: &DynVector<T>) -> Self {
        let n = v.len();
        let mut m = Self::zeros(n, n, T::zero());
        for i in 0..n {
            m[(i, i)] = v[i];
        }
        m
    }
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Check whether the matrix is symmetric within tolerance:
    /// `|a_ij - a_ji| <= atol + rtol * |a_ji|` for every pair.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let sym = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0 + 1e-12, 3.0]);
    /// assert!(sym.is_symmetric_approx(1e-5, 1e-8));
    /// let asym = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.5, 3.0]);
    /// assert!(!asym.is_symmetric_approx(1e-5, 1e-8));
    /// ```
    pub fn is_symmetric_approx(&self, rtol: T, atol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self[(i, j)];
                let b = self[(j, i)];
                if (a - b).abs() > atol + rtol * b.abs() {
                    return false;
                }
            }
        }
        true
    }
}
