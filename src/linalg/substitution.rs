//! Triangular solves shared by elimination and every factorization.
//!
//! Each routine reads its triangle through [`MatrixRef`], so `Lᵀ·x = y` is
//! solved by handing [`back_substitute`] a [`Transposed`](crate::Transposed)
//! view of `L`. `sym` names the unknown and right-hand side in the trail,
//! e.g. `("y", "b")`.

use crate::trail::Trail;
use crate::traits::{FloatScalar, MatrixRef};

/// Solve `L·y = b` for unit-lower-triangular `L` (the diagonal is not read).
///
/// `y_i = b_i - Σ_{j<i} l_ij·y_j`
pub(crate) fn forward_substitute_unit<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    b: &[T],
    sym: (&str, &str),
    trail: &mut Trail,
) -> Vec<T> {
    let n = l.nrows();
    let (out, rhs) = sym;
    let mut y = vec![T::zero(); n];
    for i in 0..n {
        let mut sum = T::zero();
        for j in 0..i {
            sum = sum + *l.get(i, j) * y[j];
        }
        y[i] = b[i] - sum;
        trail.push(format!(
            "{o}_{k} = {r}_{k} - Σ = {} - {} = {}",
            trail.num(b[i]),
            trail.num(sum),
            trail.num(y[i]),
            o = out,
            r = rhs,
            k = i + 1,
        ));
    }
    y
}

/// Solve `L·y = b` for general lower-triangular `L`.
///
/// `y_i = (b_i - Σ_{j<i} l_ij·y_j) / l_ii`
pub(crate) fn forward_substitute<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    b: &[T],
    sym: (&str, &str),
    trail: &mut Trail,
) -> Vec<T> {
    let n = l.nrows();
    let (out, rhs) = sym;
    let mut y = vec![T::zero(); n];
    for i in 0..n {
        let mut sum = T::zero();
        for j in 0..i {
            sum = sum + *l.get(i, j) * y[j];
        }
        let diag = *l.get(i, i);
        y[i] = (b[i] - sum) / diag;
        trail.push(format!(
            "{o}_{k} = ({r}_{k} - Σ) / {} = ({} - {}) / {} = {}",
            trail.num(diag),
            trail.num(b[i]),
            trail.num(sum),
            trail.num(diag),
            trail.num(y[i]),
            o = out,
            r = rhs,
            k = i + 1,
        ));
    }
    y
}

/// Solve `U·x = y` for upper-triangular `U`, from the last row up.
///
/// `x_i = (y_i - Σ_{j>i} u_ij·x_j) / u_ii`
pub(crate) fn back_substitute<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    y: &[T],
    sym: (&str, &str),
    trail: &mut Trail,
) -> Vec<T> {
    let n = u.nrows();
    let (out, rhs) = sym;
    let mut x = vec![T::zero(); n];
    for i in (0..n).rev() {
        let mut sum = T::zero();
        for j in (i + 1)..n {
            sum = sum + *u.get(i, j) * x[j];
        }
        let diag = *u.get(i, i);
        x[i] = (y[i] - sum) / diag;
        trail.push(format!(
            "{o}_{k} = ({r}_{k} - Σ) / {} = ({} - {}) / {} = {}",
            trail.num(diag),
            trail.num(y[i]),
            trail.num(sum),
            trail.num(diag),
            trail.num(x[i]),
            o = out,
            r = rhs,
            k = i + 1,
        ));
    }
    x
}
