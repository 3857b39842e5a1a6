use core::ops::{Index, IndexMut};

use crate::traits::Scalar;

/// Dynamically-sized vector: a right-hand side `b` or a solution `x`.
///
/// # Examples
///
/// ```
/// use gauss_linsys::DynVector;
///
/// let v = DynVector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynVector<T> {
    data: Vec<T>,
}

impl<T: Scalar> DynVector<T> {
    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Create a vector from an owned `Vec`.
    ///
    /// ```
    /// use gauss_linsys::DynVector;
    /// let v = DynVector::from_vec(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v[2], 3.0);
    /// ```
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a zero vector of length `n`.
    pub fn zeros(n: usize, _zero: T) -> Self {
        Self {
            data: vec![T::zero(); n],
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dot product.
    ///
    /// ```
    /// use gauss_linsys::DynVector;
    /// let a = DynVector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = DynVector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(self.len(), rhs.len(), "vector length mismatch");
        let mut sum = T::zero();
        for i in 0..self.len() {
            sum = sum + self[i] * rhs[i];
        }
        sum
    }

    /// View the vector data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the vector data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the vector, returning its storage.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for DynVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for DynVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Scalar> From<Vec<T>> for DynVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice() {
        let v = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn zeros() {
        let v = DynVector::zeros(4, 0.0_f64);
        assert_eq!(v.len(), 4);
        for i in 0..4 {
            assert_eq!(v[i], 0.0);
        }
        assert!(DynVector::zeros(0, 0.0_f64).is_empty());
    }

    #[test]
    fn index_mut() {
        let mut v = DynVector::zeros(3, 0.0_f64);
        v[1] = 42.0;
        assert_eq!(v[1], 42.0);
        v.as_mut_slice()[2] = 7.0;
        assert_eq!(v.into_vec(), vec![0.0, 42.0, 7.0]);
    }

    #[test]
    fn dot_product() {
        let a = DynVector::from_slice(&[1.0, 2.0, 3.0]);
        let b = DynVector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    fn from_std_vec() {
        let v: DynVector<f64> = vec![10.0, 20.0].into();
        assert_eq!(v.as_slice(), &[10.0, 20.0]);
    }
}
