//! Audit trail: the human-readable, step-by-step record of a computation.
//!
//! A trail is append-only and purely observational. Solvers write to it as
//! they go; nothing in the numeric code ever reads it back.

use core::fmt;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::traits::Scalar;

const BANNER_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 40;
const CELL_WIDTH: usize = 10;

/// Ordered log of computational steps, with the decimal precision used to
/// render numbers.
///
/// ```
/// use gauss_linsys::Trail;
///
/// let mut trail = Trail::new(2);
/// trail.push(format!("x_1 = {}", trail.num(0.5_f64)));
/// assert_eq!(trail.lines(), &["x_1 = 0.50"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trail {
    lines: Vec<String>,
    precision: usize,
}

impl Trail {
    pub fn new(precision: usize) -> Self {
        Self {
            lines: Vec::new(),
            precision,
        }
    }

    /// Decimal places used when rendering numbers.
    #[inline]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Append one record.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Move every record of `other` onto the end of this trail.
    pub fn append(&mut self, other: Trail) {
        self.lines.extend(other.lines);
    }

    /// A title framed by `=` rules.
    pub fn banner(&mut self, title: &str) {
        let rule = "=".repeat(BANNER_WIDTH);
        self.lines.push(rule.clone());
        self.lines.push(title.to_string());
        self.lines.push(rule);
    }

    /// A lighter `─` framed sub-heading.
    pub fn section(&mut self, title: &str) {
        let rule = "─".repeat(SECTION_WIDTH);
        self.lines.push(rule.clone());
        self.lines.push(title.to_string());
        self.lines.push(rule);
    }

    /// Render a number at the trail's precision.
    pub fn num<T: fmt::Display>(&self, v: T) -> String {
        format!("{:.*}", self.precision, v)
    }

    /// Record a matrix, one bracketed row per line.
    pub fn matrix<T: fmt::Display>(&mut self, name: &str, a: &DynMatrix<T>) {
        let block = self.render(name, a, None);
        self.lines.push(block);
    }

    /// Record an augmented system `[A | b]`.
    pub fn augmented<T: fmt::Display>(&mut self, name: &str, a: &DynMatrix<T>, b: &[T]) {
        let block = self.render(name, a, Some(b));
        self.lines.push(block);
    }

    /// Record a vector as `name = [v1, v2, …]`.
    pub fn vector<T: fmt::Display>(&mut self, name: &str, v: &[T]) {
        let body = v.iter().map(|x| self.num(x)).collect::<Vec<_>>().join(", ");
        self.lines.push(format!("{} = [{}]", name, body));
    }

    /// Convenience for [`vector`](Self::vector) on a [`DynVector`].
    pub fn dyn_vector<T: Scalar + fmt::Display>(&mut self, name: &str, v: &DynVector<T>) {
        self.vector(name, v.as_slice());
    }

    fn render<T: fmt::Display>(&self, name: &str, a: &DynMatrix<T>, b: Option<&[T]>) -> String {
        let mut out = format!("{}:", name);
        for i in 0..a.nrows() {
            out.push_str("\n  [");
            for v in a.row_slice(i) {
                out.push_str(&format!("{:>w$.p$}", v, w = CELL_WIDTH, p = self.precision));
            }
            if let Some(b) = b {
                out.push_str(&format!(" | {:>w$.p$}", b[i], w = CELL_WIDTH, p = self.precision));
            }
            out.push_str(" ]");
        }
        out
    }

    /// All records in order.
    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Whether any record contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_and_section() {
        let mut t = Trail::new(6);
        t.banner("PARTIAL PIVOTING");
        t.section("Step 1");
        assert_eq!(t.len(), 6);
        assert_eq!(t.lines()[0], "=".repeat(60));
        assert_eq!(t.lines()[1], "PARTIAL PIVOTING");
        assert_eq!(t.lines()[3].chars().count(), 40);
    }

    #[test]
    fn augmented_layout() {
        let mut t = Trail::new(2);
        let a = DynMatrix::from_rows(2, 2, &[1.0, -2.0, 3.5, 4.0]);
        t.augmented("System", &a, &[5.0, 6.0]);
        assert_eq!(
            t.lines()[0],
            "System:\n  [      1.00     -2.00 |       5.00 ]\n  [      3.50      4.00 |       6.00 ]"
        );
    }

    #[test]
    fn vector_layout() {
        let mut t = Trail::new(3);
        t.vector("x", &[1.0, -0.5]);
        t.dyn_vector("y", &DynVector::from_slice(&[2.0]));
        assert_eq!(t.lines(), &["x = [1.000, -0.500]", "y = [2.000]"]);
    }

    #[test]
    fn display_joins_lines() {
        let mut t = Trail::new(6);
        t.push("a");
        t.push("b");
        assert_eq!(t.to_string(), "a\nb");
        assert!(t.contains("b"));
        let mut other = Trail::new(6);
        other.push("c");
        t.append(other);
        assert_eq!(
            t.into_lines(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
