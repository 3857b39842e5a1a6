//! # gauss-linsys
//!
//! Direct solvers for dense linear systems `A·x = b`, with a step-by-step
//! audit trail of every computation.
//!
//! ## Quick start
//!
//! ```
//! use gauss_linsys::{eliminate, DynMatrix, DynVector, PivotPolicy};
//!
//! let a = DynMatrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);
//! let sol = eliminate(&a, &b, PivotPolicy::Partial).unwrap();
//! let x = &sol.value.x; // x = [2, 3, -1]
//! assert!((x[0] - 2.0).abs() < 1e-12);
//! println!("{}", sol.trail);
//! ```
//!
//! ## Modules
//!
//! - [`linalg`]: Gaussian elimination under three pivot policies
//!   ([`PivotPolicy::Partial`], [`PivotPolicy::Scaled`], [`PivotPolicy::Total`])
//!   and four factorizations: Doolittle LU, PLU, Cholesky (`A = L·Lᵀ`) and
//!   LDLᵀ. Each factorization has matching `solve_*` / `solve_*_with` free functions, a
//!   factors struct with `reconstruct()` / `solve()`, and a convenience method
//!   on [`DynMatrix`]. [`Factorization`] dispatches over the four kinds.
//!
//! - [`dynmatrix`]: Heap-allocated `DynMatrix<T>` (row-major `Vec<T>`) and
//!   [`DynVector<T>`], with the products, transposes and row/column swaps
//!   the solvers need.
//!
//! - [`permutation`]: [`Permutation`] index records for row and column
//!   reorderings, convertible to permutation matrices.
//!
//! - [`trail`]: [`Trail`], the ordered human-readable record each solver
//!   returns alongside its result (and inside its error).
//!
//! - [`fit`]: Least-squares linear, exponential, power and polynomial fits.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float + Display`), used by every solver
//!   - [`MatrixRef`]: read access for the triangular solves, implemented by
//!     [`DynMatrix`] and the zero-copy [`Transposed`] view
//!
//! ## Errors
//!
//! Every solver returns `Result<Traced<_>, TracedError>`. [`TracedError`]
//! pairs a typed [`LinalgError`] with the trail recorded up to the failure.
//! Input errors (non-square matrix, wrong right-hand-side length) are raised
//! before any arithmetic; see [`LinalgError::is_input_error`].
//!
//! ## Logging
//!
//! Pivot swaps and failures are emitted through the [`log`] facade at `debug`,
//! asymmetric input to Cholesky/LDLᵀ at `warn`, and completed factorizations
//! at `trace`. Install any `log` backend to see them.

pub mod dynmatrix;
pub mod fit;
pub mod linalg;
pub mod permutation;
pub mod trail;
pub mod traits;

pub use dynmatrix::{DynMatrix, DynVector};
pub use linalg::{
    eliminate, eliminate_with, factorize_cholesky, factorize_cholesky_with, factorize_ldlt,
    factorize_ldlt_with, factorize_lu, factorize_lu_with, factorize_plu, factorize_plu_with,
    solve_cholesky, solve_cholesky_with, solve_ldlt, solve_ldlt_with, solve_lu, solve_lu_with,
    solve_plu, solve_plu_with, CholeskyFactors, Elimination, FactorKind, Factorization,
    LdltFactors, LinalgError, LuFactors, PivotPolicy, PluFactors, SolverSettings, Traced,
    TracedError,
};
pub use permutation::Permutation;
pub use trail::Trail;
pub use traits::{FloatScalar, MatrixRef, Scalar, Transposed};
