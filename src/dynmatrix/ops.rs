use core::ops::{Mul, Sub};

use crate::traits::Scalar;

use super::vector::DynVector;
use super::DynMatrix;

// ── Element-wise subtraction ────────────────────────────────────────

impl<T: Scalar> Sub<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn sub(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch: {}x{} - {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| a - b)
            .collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<&DynMatrix<T>> for DynMatrix<T> {
    type Output = DynMatrix<T>;
    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        &self * rhs
    }
}

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        for i in 0..m {
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                for j in 0..p {
                    data[i * p + j] = data[i * p + j] + a_ik * rhs.data[k * p + j];
                }
            }
        }
        DynMatrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

// ── Matrix-vector product: (M×N) * N → M ────────────────────────────

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;

    fn mul(self, rhs: &DynVector<T>) -> DynVector<T> {
        assert_eq!(
            self.ncols,
            rhs.len(),
            "dimension mismatch: {}x{} * {}",
            self.nrows, self.ncols, rhs.len(),
        );
        let out = (0..self.nrows)
            .map(|i| {
                self.row_slice(i)
                    .iter()
                    .zip(rhs.as_slice())
                    .fold(T::zero(), |acc, (&a, &x)| acc + a * x)
            })
            .collect();
        DynVector::from_vec(out)
    }
}

// ── Transpose ───────────────────────────────────────────────────────

impl<T: Copy> DynMatrix<T> {
    /// Transpose: `(M×N)` → `(N×M)`.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = a.transpose();
    /// assert_eq!(t.nrows(), 3);
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Self {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self[(j, i)])
    }
}
