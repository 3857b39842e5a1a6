//! Least-squares curve fitting built on the elimination engine.
//!
//! | Model        | Form              | Linearization            |
//! |--------------|-------------------|--------------------------|
//! | linear       | `y = a₀ + a₁·x`   | none                     |
//! | exponential  | `y = a·e^(b·x)`   | `ln y = ln a + b·x`      |
//! | power        | `y = a·x^b`       | `ln y = ln a + b·ln x`   |
//! | polynomial   | `y = Σ aᵢ·xⁱ`     | normal equations         |
//!
//! Linearized fits report the correlation coefficient of the transformed
//! data. Polynomial fits solve the normal equations with partial pivoting.

use thiserror::Error;

use crate::dynmatrix::{DynMatrix, DynVector};
use crate::linalg::{eliminate_with, PivotPolicy, SolverSettings, Traced, TracedError};
use crate::trail::Trail;
use crate::traits::FloatScalar;

/// Errors from least-squares fitting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("x and y must have the same length, got {x} and {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("need at least {needed} data points, got {got}")]
    InsufficientData { needed: usize, got: usize },
    /// A value that must be logged is `<= 0`.
    #[error("data point {} must be positive for this model", .index + 1)]
    NonPositive { index: usize },
    /// All `x` (or transformed `x`) values coincide.
    #[error("degenerate data: n·Σx² - (Σx)² is zero")]
    Degenerate,
    #[error(transparent)]
    Linalg(#[from] TracedError),
}

/// `y = a0 + a1·x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    pub a0: T,
    pub a1: T,
    /// Correlation coefficient.
    pub r: T,
}

impl<T: FloatScalar> LinearFit<T> {
    pub fn eval(&self, x: T) -> T {
        self.a0 + self.a1 * x
    }
}

/// `y = a·e^(b·x)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialFit<T> {
    pub a: T,
    pub b: T,
    /// Correlation coefficient of `(x, ln y)`.
    pub r: T,
}

impl<T: FloatScalar> ExponentialFit<T> {
    pub fn eval(&self, x: T) -> T {
        self.a * (self.b * x).exp()
    }
}

/// `y = a·x^b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerFit<T> {
    pub a: T,
    pub b: T,
    /// Correlation coefficient of `(ln x, ln y)`.
    pub r: T,
}

impl<T: FloatScalar> PowerFit<T> {
    pub fn eval(&self, x: T) -> T {
        self.a * x.powf(self.b)
    }
}

/// `y = c₀ + c₁·x + … + c_d·x^d`
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit<T> {
    /// Coefficients in ascending powers of `x`.
    pub coefficients: DynVector<T>,
}

impl<T: FloatScalar> PolynomialFit<T> {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: T) -> T {
        self.coefficients
            .as_slice()
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }
}

/// Fit `y = a0 + a1·x`.
///
/// ```text
/// a1 = (n·Σxy - Σx·Σy) / (n·Σx² - (Σx)²)
/// a0 = (Σy - a1·Σx) / n
/// ```
///
/// # Example
///
/// ```
/// use gauss_linsys::fit::linear_fit;
///
/// let fit = linear_fit(&[1.0_f64, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap().value;
/// assert!((fit.a0 - 1.0).abs() < 1e-12);
/// assert!((fit.a1 - 2.0).abs() < 1e-12);
/// assert!((fit.r - 1.0).abs() < 1e-12);
/// ```
pub fn linear_fit<T: FloatScalar>(x: &[T], y: &[T]) -> Result<Traced<LinearFit<T>>, FitError>
where
    SolverSettings<T>: Default,
{
    check_data(x, y, 2)?;
    let mut trail = SolverSettings::<T>::default().trail();
    trail.banner("LEAST SQUARES - LINEAR FIT");
    trail.push("Model: y = a₀ + a₁·x");
    data_table(x, y, &mut trail);

    let (a0, a1, r) = straight_line(x, y, &mut trail)?;

    trail.banner("RESULT");
    trail.push(format!("y = {} + {}·x", trail.num(a0), trail.num(a1)));
    Ok(Traced {
        value: LinearFit { a0, a1, r },
        trail,
    })
}

/// Fit `y = a·e^(b·x)` through `ln y = ln a + b·x`. Every `y` must be positive.
pub fn exponential_fit<T: FloatScalar>(
    x: &[T],
    y: &[T],
) -> Result<Traced<ExponentialFit<T>>, FitError>
where
    SolverSettings<T>: Default,
{
    check_data(x, y, 2)?;
    let ln_y = logs(y)?;
    let mut trail = SolverSettings::<T>::default().trail();
    trail.banner("LEAST SQUARES - EXPONENTIAL FIT");
    trail.push("Model: y = a·e^(bx)");
    trail.push("Linearized: Y = A + b·x  with Y = ln(y), A = ln(a)");

    let (big_a, b, r) = straight_line(x, &ln_y, &mut trail)?;
    let a = big_a.exp();
    trail.push(format!("a = e^A = {}", trail.num(a)));

    trail.banner("RESULT");
    trail.push(format!("y = {}·e^({}·x)", trail.num(a), trail.num(b)));
    Ok(Traced {
        value: ExponentialFit { a, b, r },
        trail,
    })
}

/// Fit `y = a·x^b` through `ln y = ln a + b·ln x`. Every `x` and `y` must be positive.
pub fn power_fit<T: FloatScalar>(x: &[T], y: &[T]) -> Result<Traced<PowerFit<T>>, FitError>
where
    SolverSettings<T>: Default,
{
    check_data(x, y, 2)?;
    let ln_x = logs(x)?;
    let ln_y = logs(y)?;
    let mut trail = SolverSettings::<T>::default().trail();
    trail.banner("LEAST SQUARES - POWER FIT");
    trail.push("Model: y = a·x^b");
    trail.push("Linearized: Y = A + b·X  with Y = ln(y), X = ln(x), A = ln(a)");

    let (big_a, b, r) = straight_line(&ln_x, &ln_y, &mut trail)?;
    let a = big_a.exp();
    trail.push(format!("a = e^A = {}", trail.num(a)));

    trail.banner("RESULT");
    trail.push(format!("y = {}·x^{}", trail.num(a), trail.num(b)));
    Ok(Traced {
        value: PowerFit { a, b, r },
        trail,
    })
}

/// Fit a polynomial of `degree` by solving the normal equations
/// `Σ_j (Σ_k x_k^(i+j))·c_j = Σ_k y_k·x_k^i` with partial pivoting.
///
/// ```
/// use gauss_linsys::fit::polynomial_fit;
///
/// let x = [0.0_f64, 1.0, 2.0, 3.0];
/// let y: Vec<f64> = x.iter().map(|&t| 1.0 - 2.0 * t + t * t).collect();
/// let fit = polynomial_fit(&x, &y, 2).unwrap().value;
/// assert!((fit.coefficients[2] - 1.0).abs() < 1e-9);
/// assert!((fit.eval(5.0) - 16.0).abs() < 1e-8);
/// ```
pub fn polynomial_fit<T: FloatScalar>(
    x: &[T],
    y: &[T],
    degree: usize,
) -> Result<Traced<PolynomialFit<T>>, FitError>
where
    SolverSettings<T>: Default,
{
    let n = degree + 1;
    check_data(x, y, n)?;
    let settings = SolverSettings::<T>::default();
    let mut trail = settings.trail();
    trail.banner(&format!("LEAST SQUARES - POLYNOMIAL FIT OF DEGREE {}", degree));

    // Power sums Σx^p for p in 0..=2·degree
    let sums: Vec<T> = (0..2 * n - 1)
        .map(|p| x.iter().fold(T::zero(), |acc, &xi| acc + xi.powi(p as i32)))
        .collect();
    let a = DynMatrix::from_fn(n, n, |i, j| sums[i + j]);
    let b: Vec<T> = (0..n)
        .map(|i| {
            x.iter()
                .zip(y)
                .fold(T::zero(), |acc, (&xi, &yi)| acc + yi * xi.powi(i as i32))
        })
        .collect();
    trail.augmented("Normal equations [A | b]", &a, &b);

    let solved = eliminate_with(&a, &DynVector::from_vec(b), PivotPolicy::Partial, &settings)?;
    trail.append(solved.trail);
    let coefficients = solved.value.x;

    trail.banner("RESULT");
    let mut poly = format!("y = {}", trail.num(coefficients[0]));
    for i in 1..n {
        let c = coefficients[i];
        let sign = if c >= T::zero() { '+' } else { '-' };
        poly.push_str(&format!(" {} {}·x", sign, trail.num(c.abs())));
        if i > 1 {
            poly.push_str(&format!("^{}", i));
        }
    }
    trail.push(poly);

    Ok(Traced {
        value: PolynomialFit { coefficients },
        trail,
    })
}

// ── Shared helpers ──────────────────────────────────────────────────

fn check_data<T>(x: &[T], y: &[T], needed: usize) -> Result<(), FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < needed {
        return Err(FitError::InsufficientData {
            needed,
            got: x.len(),
        });
    }
    Ok(())
}

fn logs<T: FloatScalar>(v: &[T]) -> Result<Vec<T>, FitError> {
    v.iter()
        .enumerate()
        .map(|(index, &vi)| {
            if vi > T::zero() {
                Ok(vi.ln())
            } else {
                Err(FitError::NonPositive { index })
            }
        })
        .collect()
}

fn data_table<T: FloatScalar>(x: &[T], y: &[T], trail: &mut Trail) {
    let p = trail.precision();
    trail.push(format!("{:>3} {:>12} {:>12} {:>12} {:>12}", "i", "xᵢ", "yᵢ", "xᵢ²", "xᵢyᵢ"));
    for (i, (&xi, &yi)) in x.iter().zip(y).enumerate() {
        trail.push(format!(
            "{:>3} {:>12.p$} {:>12.p$} {:>12.p$} {:>12.p$}",
            i + 1,
            xi,
            yi,
            xi * xi,
            xi * yi,
        ));
    }
}

/// Closed-form least-squares line through `(x, y)`, returning `(intercept, slope, r)`.
fn straight_line<T: FloatScalar>(x: &[T], y: &[T], trail: &mut Trail) -> Result<(T, T, T), FitError> {
    let n = T::from(x.len()).unwrap();
    let (mut sx, mut sy, mut sxy, mut sx2, mut sy2) =
        (T::zero(), T::zero(), T::zero(), T::zero(), T::zero());
    for (&xi, &yi) in x.iter().zip(y) {
        sx = sx + xi;
        sy = sy + yi;
        sxy = sxy + xi * yi;
        sx2 = sx2 + xi * xi;
        sy2 = sy2 + yi * yi;
    }
    trail.push(format!(
        "n = {}, Σx = {}, Σy = {}, Σxy = {}, Σx² = {}",
        x.len(),
        trail.num(sx),
        trail.num(sy),
        trail.num(sxy),
        trail.num(sx2),
    ));

    let denom = n * sx2 - sx * sx;
    if denom.abs() <= T::epsilon() * (n * sx2).abs() {
        log::debug!("least-squares fit rejected: all x values coincide");
        return Err(FitError::Degenerate);
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    trail.push("slope = (n·Σxy - Σx·Σy) / (n·Σx² - (Σx)²)");
    trail.push(format!("slope = {}", trail.num(slope)));
    trail.push("intercept = (Σy - slope·Σx) / n");
    trail.push(format!("intercept = {}", trail.num(intercept)));

    // Constant y lies exactly on the fitted (horizontal) line.
    let spread_y = n * sy2 - sy * sy;
    let r = if spread_y.abs() <= T::epsilon() * (n * sy2).abs() {
        T::one()
    } else {
        (n * sxy - sx * sy) / (denom * spread_y).sqrt()
    };
    trail.push(format!("r = {}, r² = {}", trail.num(r), trail.num(r * r)));

    Ok((intercept, slope, r))
}
