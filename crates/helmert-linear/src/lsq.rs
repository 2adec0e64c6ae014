//! Ordinary and weighted linear least squares via normal equations.
//!
//! The normal matrix `N = AᵀWA` is equilibrated with `D = diag(N)^(-1/2)`
//! before it is checked and factorised. Helmert columns differ by about
//! seven orders of magnitude (unit translations against Earth-radius scale
//! and rotation coefficients), so the raw condition number says nothing
//! about solvability. The equilibrated matrix `DND` has a unit diagonal and
//! its reciprocal condition number is compared against
//! [`LeastSquaresOptions::min_rcond`].
//!
//! Given the Cholesky factor of `DND`:
//!
//! ```text
//! x = D (DND)⁻¹ D AᵀWb
//! C = D (DND)⁻¹ D        (covariance, weighted case)
//! ```

use helmert_core::{HelmertError, Real, Result};
use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Options for the normal-equation solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeastSquaresOptions {
    /// Smallest accepted reciprocal condition number of the equilibrated
    /// normal matrix.
    pub min_rcond: Real,
}

impl Default for LeastSquaresOptions {
    fn default() -> Self {
        Self { min_rcond: 1e-12 }
    }
}

/// Solution of a least-squares problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresSolution {
    /// Estimated unknowns, in design column order.
    pub values: DVector<Real>,
    /// One-sigma uncertainties `sqrt(diag(C))`; only for the weighted solve.
    pub sigmas: Option<DVector<Real>>,
}

/// Minimise `‖Ax − b‖²`.
pub fn solve_ordinary(
    a: &DMatrix<Real>,
    b: &DVector<Real>,
    opts: &LeastSquaresOptions,
) -> Result<LeastSquaresSolution> {
    check_shapes(a, b)?;
    let normal = a.tr_mul(a);
    let rhs = a.tr_mul(b);
    let (values, _) = solve_normal(normal, &rhs, a.nrows(), opts)?;
    Ok(LeastSquaresSolution {
        values,
        sigmas: None,
    })
}

/// Minimise `(Ax − b)ᵀ W (Ax − b)` with `W = diag(1 / variances)`.
///
/// Every variance must be strictly positive and finite.
pub fn solve_weighted(
    a: &DMatrix<Real>,
    b: &DVector<Real>,
    variances: &DVector<Real>,
    opts: &LeastSquaresOptions,
) -> Result<LeastSquaresSolution> {
    check_shapes(a, b)?;
    if variances.len() != b.len() {
        return Err(HelmertError::LengthMismatch {
            what: "variance vector",
            expected: b.len(),
            got: variances.len(),
        });
    }
    if let Some((index, &value)) = variances
        .iter()
        .enumerate()
        .find(|(_, v)| !(**v > 0.0 && v.is_finite()))
    {
        return Err(HelmertError::NonPositiveVariance { index, value });
    }

    let weights = variances.map(|v| 1.0 / v);
    // AᵀW, scaling the columns of Aᵀ by the weights.
    let mut at_w = a.transpose();
    for (mut col, &w) in at_w.column_iter_mut().zip(weights.iter()) {
        col *= w;
    }
    let normal = &at_w * a;
    let rhs = &at_w * b;

    let (values, covariance) = solve_normal(normal, &rhs, a.nrows(), opts)?;
    let sigmas = covariance.diagonal().map(|v| v.max(0.0).sqrt());
    Ok(LeastSquaresSolution {
        values,
        sigmas: Some(sigmas),
    })
}

fn check_shapes(a: &DMatrix<Real>, b: &DVector<Real>) -> Result<()> {
    if a.nrows() != b.len() {
        return Err(HelmertError::LengthMismatch {
            what: "observation vector",
            expected: a.nrows(),
            got: b.len(),
        });
    }
    Ok(())
}

/// Solve `N x = rhs` for a symmetric positive semi-definite `N`, returning
/// the solution and `N⁻¹`.
fn solve_normal(
    normal: DMatrix<Real>,
    rhs: &DVector<Real>,
    equations: usize,
    opts: &LeastSquaresOptions,
) -> Result<(DVector<Real>, DMatrix<Real>)> {
    let k = normal.nrows();
    let singular = |rcond: Real| HelmertError::SingularNormalMatrix {
        rcond,
        unknowns: k,
        equations,
    };

    if k == 0 {
        return Ok((DVector::zeros(0), DMatrix::zeros(0, 0)));
    }
    if k > equations {
        return Err(singular(0.0));
    }

    let diag = normal.diagonal();
    if diag.iter().any(|&d| !(d > 0.0 && d.is_finite())) {
        return Err(singular(0.0));
    }
    let d = diag.map(|v| 1.0 / v.sqrt());
    let scaled = DMatrix::from_fn(k, k, |i, j| d[i] * normal[(i, j)] * d[j]);

    let rcond = reciprocal_condition(&scaled);
    debug!("normal matrix: {k} unknowns, {equations} equations, rcond {rcond:.3e}");
    if !(rcond >= opts.min_rcond) {
        return Err(singular(rcond));
    }

    let chol = scaled.cholesky().ok_or_else(|| singular(rcond))?;
    let scaled_rhs = rhs.component_mul(&d);
    let y = chol.solve(&scaled_rhs);
    let values = y.component_mul(&d);

    let inv = chol.inverse();
    let covariance = DMatrix::from_fn(k, k, |i, j| d[i] * inv[(i, j)] * d[j]);
    Ok((values, covariance))
}

/// Ratio of the smallest to the largest eigenvalue of a symmetric matrix.
fn reciprocal_condition(m: &DMatrix<Real>) -> Real {
    let eig = m.clone().symmetric_eigenvalues();
    let max = eig.iter().copied().fold(Real::NEG_INFINITY, Real::max);
    let min = eig.iter().copied().fold(Real::INFINITY, Real::min);
    if max <= 0.0 {
        return 0.0;
    }
    (min / max).max(0.0)
}
