//! Min-max feature scaling

use crate::error::{Result, WorkbenchError};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Added to every column range so constant columns do not divide by zero
pub const SCALE_EPSILON: f64 = 1e-8;

/// Per-feature minimum and maximum captured from a training matrix.
///
/// `apply` maps `x` to `(x - min) / (max - min + SCALE_EPSILON)` and `invert`
/// undoes it. The same instance must be used for training data and every
/// later prediction input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleParams {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl ScaleParams {
    /// Compute column-wise min and max
    pub fn fit(x: &Array2<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(WorkbenchError::InsufficientData(
                "cannot compute scale parameters of an empty matrix".to_string(),
            ));
        }

        let min = x.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
        let max = x.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));

        Ok(Self {
            min: min.to_vec(),
            max: max.to_vec(),
        })
    }

    /// Number of features these parameters were fitted on
    pub fn n_features(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Scale a matrix with the stored parameters
    pub fn apply(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;
        Ok(Array2::from_shape_fn(x.dim(), |(i, j)| {
            (x[[i, j]] - self.min[j]) / self.denominator(j)
        }))
    }

    /// Map scaled values back to the original units
    pub fn invert(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;
        Ok(Array2::from_shape_fn(x.dim(), |(i, j)| {
            x[[i, j]] * self.denominator(j) + self.min[j]
        }))
    }

    fn denominator(&self, j: usize) -> f64 {
        self.max[j] - self.min[j] + SCALE_EPSILON
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.n_features() {
            return Err(WorkbenchError::shape(
                format!("{} features", self.n_features()),
                format!("{} features", x.ncols()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_captures_min_max() {
        let x = array![[1.0, 10.0], [3.0, 30.0], [2.0, 20.0]];
        let params = ScaleParams::fit(&x).unwrap();
        assert_eq!(params.min(), &[1.0, 10.0]);
        assert_eq!(params.max(), &[3.0, 30.0]);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let x = array![[5.0], [5.0], [5.0]];
        let params = ScaleParams::fit(&x).unwrap();
        let scaled = params.apply(&x).unwrap();
        assert!(scaled.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invert_restores_input() {
        let x = array![[1.0, -4.0], [2.5, 0.0], [7.0, 12.0]];
        let params = ScaleParams::fit(&x).unwrap();
        let restored = params.invert(&params.apply(&x).unwrap()).unwrap();
        for (a, b) in x.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_width_mismatch() {
        let params = ScaleParams::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let err = params.apply(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(err, WorkbenchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            ScaleParams::fit(&x),
            Err(WorkbenchError::InsufficientData(_))
        ));
    }
}
