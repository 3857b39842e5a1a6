use core::fmt::{Debug, Display};
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by every solver and factorization: they need `abs`, `sqrt`,
/// ordered comparisons against a pivot tolerance, and `Display` so that
/// intermediate values can be written to the audit trail.
pub trait FloatScalar: Scalar + Float + Display {}

impl<T: Scalar + Float + Display> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// The triangular substitution routines are generic over this trait, so they
/// run unchanged against an owned [`DynMatrix`](crate::DynMatrix) or a
/// [`Transposed`] view of one.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Zero-copy transposed view: `get(i, j)` reads `inner.get(j, i)`.
///
/// ```
/// use gauss_linsys::{DynMatrix, MatrixRef, Transposed};
///
/// let l = DynMatrix::from_rows(2, 2, &[1.0_f64, 0.0, 3.0, 1.0]);
/// let lt = Transposed(&l);
/// assert_eq!(*lt.get(0, 1), 3.0);
/// assert_eq!(*lt.get(1, 0), 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Transposed<'a, M>(pub &'a M);

impl<T, M: MatrixRef<T>> MatrixRef<T> for Transposed<'_, M> {
    #[inline]
    fn nrows(&self) -> usize {
        self.0.ncols()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.0.nrows()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        self.0.get(col, row)
    }
}
