//! Permutation records for pivoting.
//!
//! A [`Permutation`] `p` of length `n` is a bijection on `{0, …, n-1}`.
//! Entry `p[i]` names the *original* index now sitting at position `i`:
//! for row pivoting that is the original row of the current row `i`, for
//! total pivoting's column record it is the original variable held by
//! current column `i`.

use core::fmt;

use crate::dynmatrix::DynMatrix;
use crate::traits::Scalar;

/// Ordered index record, identity at creation, composed with every swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// The identity permutation `[0, 1, …, n-1]`.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Build from explicit indices. Returns `None` unless they form a bijection.
    ///
    /// ```
    /// use gauss_linsys::Permutation;
    /// assert!(Permutation::from_indices(vec![2, 0, 1]).is_some());
    /// assert!(Permutation::from_indices(vec![0, 0, 1]).is_none());
    /// ```
    pub fn from_indices(indices: Vec<usize>) -> Option<Self> {
        let p = Self { indices };
        p.is_bijection().then_some(p)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Record a swap of positions `a` and `b`.
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.indices.swap(a, b);
    }

    /// Whether every index in `0..n` appears exactly once.
    pub fn is_bijection(&self) -> bool {
        let n = self.indices.len();
        let mut seen = vec![false; n];
        for &i in &self.indices {
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }

    /// `out[i] = v[p[i]]`, i.e. the product `P·v`.
    ///
    /// ```
    /// use gauss_linsys::Permutation;
    /// let mut p = Permutation::identity(3);
    /// p.swap(0, 2);
    /// assert_eq!(p.gather(&[10, 20, 30]), vec![30, 20, 10]);
    /// ```
    pub fn gather<T: Copy>(&self, v: &[T]) -> Vec<T> {
        assert_eq!(v.len(), self.len(), "permutation length mismatch");
        self.indices.iter().map(|&i| v[i]).collect()
    }

    /// `out[p[i]] = v[i]`, the inverse of [`gather`](Self::gather).
    ///
    /// Total pivoting uses this to put a solution computed in permuted
    /// column order back into original variable order.
    ///
    /// ```
    /// use gauss_linsys::Permutation;
    /// let p = Permutation::from_indices(vec![2, 0, 1]).unwrap();
    /// let v = [1.0, 2.0, 3.0];
    /// assert_eq!(p.scatter(&p.gather(&v)), v.to_vec());
    /// ```
    pub fn scatter<T: Copy>(&self, v: &[T]) -> Vec<T> {
        assert_eq!(v.len(), self.len(), "permutation length mismatch");
        let mut out = v.to_vec();
        for (i, &target) in self.indices.iter().enumerate() {
            out[target] = v[i];
        }
        out
    }

    /// The permutation matrix `P` with `P[i][p[i]] = 1`, so `P·A` reorders
    /// the rows of `A` the same way [`gather`](Self::gather) reorders a vector.
    pub fn to_matrix<T: Scalar>(&self) -> DynMatrix<T> {
        let n = self.len();
        let mut m = DynMatrix::zeros(n, n, T::zero());
        for (i, &j) in self.indices.iter().enumerate() {
            m[(i, j)] = T::one();
        }
        m
    }
}

/// One-based, as shown in the audit trail: `[3, 1, 2]`.
impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (k, i) in self.indices.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", i + 1)?;
        }
        write!(f, "]")
    }
}
