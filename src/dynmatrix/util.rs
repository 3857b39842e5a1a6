use core::fmt::{self, Write as _};

use crate::traits::FloatScalar;

use super::DynMatrix;

// ── Row / Column manipulation ───────────────────────────────────────

impl<T> DynMatrix<T> {
    /// Swap two rows in place.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let mut m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.swap_rows(0, 1);
    /// assert_eq!(m[(0, 0)], 3.0);
    /// assert_eq!(m[(1, 0)], 1.0);
    /// ```
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a != b {
            let n = self.ncols;
            for j in 0..n {
                self.data.swap(a * n + j, b * n + j);
            }
        }
    }

    /// Swap the first `upto` entries of two rows, leaving the rest in place.
    ///
    /// PLU uses this on `L`: only the multipliers already computed for
    /// columns `< upto` travel with their row.
    pub fn swap_rows_prefix(&mut self, a: usize, b: usize, upto: usize) {
        if a != b {
            let n = self.ncols;
            for j in 0..upto.min(n) {
                self.data.swap(a * n + j, b * n + j);
            }
        }
    }

    /// Swap two columns in place.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let mut m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.swap_cols(0, 1);
    /// assert_eq!(m[(0, 0)], 2.0);
    /// assert_eq!(m[(0, 1)], 1.0);
    /// ```
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            for i in 0..self.nrows {
                let ia = i * self.ncols + a;
                let ib = i * self.ncols + b;
                self.data.swap(ia, ib);
            }
        }
    }
}

// ── Comparison ──────────────────────────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// Largest element-wise absolute difference `max |a_ij - b_ij|`.
    ///
    /// Panics on a dimension mismatch.
    ///
    /// ```
    /// use gauss_linsys::DynMatrix;
    /// let a = DynMatrix::from_rows(1, 2, &[1.0_f64, 2.0]);
    /// let b = DynMatrix::from_rows(1, 2, &[1.5_f64, 1.0]);
    /// assert_eq!(a.max_abs_diff(&b), 1.0);
    /// ```
    pub fn max_abs_diff(&self, rhs: &Self) -> T {
        assert_eq!(
            (self.nrows, self.ncols),
            (rhs.nrows, rhs.ncols),
            "dimension mismatch",
        );
        self.data
            .iter()
            .zip(rhs.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for DynMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.nrows;
        let n = self.ncols;

        // Measure column widths
        let mut widths: Vec<usize> = vec![0; n];
        for j in 0..n {
            for i in 0..m {
                let w = WriteCounting::count(|wc| write!(wc, "{}", self[(i, j)]));
                if w > widths[j] {
                    widths[j] = w;
                }
            }
        }

        for i in 0..m {
            write!(f, "│")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", self[(i, j)], width = widths[j])?;
            }
            write!(f, "│")?;
            if i < m - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_rows() {
        let mut m = DynMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        m.swap_rows(0, 2);
        assert_eq!(m.row_slice(0), &[5.0, 6.0]);
        assert_eq!(m.row_slice(2), &[1.0, 2.0]);
    }

    #[test]
    fn swap_rows_prefix() {
        let mut m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        m.swap_rows_prefix(0, 1, 2);
        assert_eq!(m.row_slice(0), &[4.0, 5.0, 3.0]);
        assert_eq!(m.row_slice(1), &[1.0, 2.0, 6.0]);

        // upto = 0 is a no-op
        let before = m.clone();
        m.swap_rows_prefix(0, 1, 0);
        assert_eq!(m, before);
    }

    #[test]
    fn swap_cols() {
        let mut m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        m.swap_cols(0, 2);
        assert_eq!(m.row_slice(0), &[3.0, 2.0, 1.0]);
        assert_eq!(m.row_slice(1), &[6.0, 5.0, 4.0]);
    }

    #[test]
    fn max_abs_diff() {
        let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        let b = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.5, 1.0, 4.0]);
        assert_eq!(a.max_abs_diff(&b), 2.0);
        assert_eq!(a.max_abs_diff(&a), 0.0);
    }

    #[test]
    fn display() {
        let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let s = format!("{}", m);
        assert_eq!(s, "│1  2│\n│3  4│");
    }

    #[test]
    fn display_alignment() {
        let m = DynMatrix::from_rows(2, 2, &[1.0, 100.0, 3.0, 4.0]);
        let s = format!("{}", m);
        assert_eq!(s, "│1  100│\n│3    4│");
    }
}
