//! Data preprocessing module
//!
//! Cleans raw tables (mean imputation of numeric columns) and min-max scales
//! feature matrices. The scale parameters captured by `scale`
//! are kept so later prediction inputs are scaled identically.

mod imputer;
mod scaler;

pub use imputer::{fill_missing_with_mean, is_numeric_dtype};
pub use scaler::{ScaleParams, SCALE_EPSILON};

use crate::error::{Result, WorkbenchError};
use ndarray::Array2;
use polars::prelude::DataFrame;

/// Stateful cleaner and scaler owned by one pipeline
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    params: Option<ScaleParams>,
}

impl Preprocessor {
    /// Create a preprocessor with no scale parameters yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill missing numeric values with the column mean of `df`
    pub fn clean(&self, df: &DataFrame) -> Result<DataFrame> {
        fill_missing_with_mean(df)
    }

    /// Fit scale parameters on `x`, replacing any previous ones, and return
    /// the scaled matrix. Call this with training data only.
    pub fn scale(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let params = ScaleParams::fit(x)?;
        let scaled = params.apply(x)?;
        self.params = Some(params);
        Ok(scaled)
    }

    /// Scale `x` with the parameters from the last `scale` call
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.params()?.apply(x)
    }

    /// Undo `transform`
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.params()?.invert(x)
    }

    pub fn scale_params(&self) -> Option<&ScaleParams> {
        self.params.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    fn params(&self) -> Result<&ScaleParams> {
        self.params.as_ref().ok_or(WorkbenchError::UndefinedScale)
    }
}
