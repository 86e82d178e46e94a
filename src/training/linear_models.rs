//! Linear model implementations

use super::models::Model;
use crate::error::{Result, WorkbenchError};
use nalgebra::DMatrix;
use ndarray::{s, Array1, Array2};

/// Iteration cap for the SVD; hitting it is reported as a computation error
const SVD_MAX_ITERATIONS: usize = 10_000;

/// Moore-Penrose pseudo-inverse through an SVD.
///
/// Singular values below `max(m, n) * eps * sigma_max` count as zero, which
/// yields the minimum-norm least-squares solution for rank-deficient and
/// wide matrices.
fn pseudo_inverse(a: &Array2<f64>) -> Result<Array2<f64>> {
    let (m, n) = a.dim();
    if a.iter().any(|v| !v.is_finite()) {
        return Err(WorkbenchError::NonFiniteValue("design matrix".to_string()));
    }
    let matrix = DMatrix::from_fn(m, n, |i, j| a[[i, j]]);
    let svd = matrix
        .try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or_else(|| WorkbenchError::ComputationError("SVD did not converge".to_string()))?;

    let sigma_max = svd.singular_values.iter().fold(0.0f64, |acc, &v| acc.max(v));
    let tol = m.max(n) as f64 * f64::EPSILON * sigma_max;

    let pinv = svd
        .pseudo_inverse(tol)
        .map_err(|e| WorkbenchError::ComputationError(e.to_string()))?;

    Ok(Array2::from_shape_fn((n, m), |(i, j)| pinv[(i, j)]))
}

/// Prepend a constant 1.0 column for the bias term
fn with_bias(x: &Array2<f64>) -> Array2<f64> {
    let mut out = Array2::ones((x.nrows(), x.ncols() + 1));
    out.slice_mut(s![.., 1..]).assign(x);
    out
}

/// Ordinary least squares linear regression.
///
/// Weights are stored with the bias first: `[b, w_1, .., w_d]`.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    weights: Option<Array1<f64>>,
}

impl LinearRegression {
    /// Create an unfitted model
    pub fn new() -> Self {
        Self::default()
    }

    /// Full weight vector, bias first
    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.weights.as_ref().map(|w| w[0])
    }

    pub fn coefficients(&self) -> Option<Array1<f64>> {
        self.weights.as_ref().map(|w| w.slice(s![1..]).to_owned())
    }

    fn fitted_weights(&self) -> Result<&Array1<f64>> {
        self.weights.as_ref().ok_or(WorkbenchError::NotFitted)
    }
}

impl Model for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(WorkbenchError::shape(
                format!("y length = {}", x.nrows()),
                format!("y length = {}", y.len()),
            ));
        }
        if x.nrows() == 0 {
            return Err(WorkbenchError::InsufficientData(
                "linear regression needs at least one sample".to_string(),
            ));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(WorkbenchError::NonFiniteValue("target".to_string()));
        }

        let weights = pseudo_inverse(&with_bias(x))?.dot(y);
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(WorkbenchError::ComputationError(
                "least squares produced non-finite weights".to_string(),
            ));
        }

        self.weights = Some(weights);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self.fitted_weights()?;
        if x.ncols() + 1 != weights.len() {
            return Err(WorkbenchError::shape(
                format!("{} features", weights.len() - 1),
                format!("{} features", x.ncols()),
            ));
        }
        Ok(with_bias(x).dot(weights))
    }

    fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    fn name(&self) -> &'static str {
        "linear_regression"
    }
}
