//! Model trait and the closed set of model variants

use super::knn::KnnModel;
use super::linear_models::LinearRegression;
use crate::error::Result;
use ndarray::{Array1, Array2};

/// Trait for ML models
pub trait Model: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions, one per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Whether `fit` has completed
    fn is_fitted(&self) -> bool;

    /// Human readable model name
    fn name(&self) -> &'static str;

    /// Predict a single sample given as a flat feature vector
    fn predict_one(&self, features: &[f64]) -> Result<Array1<f64>> {
        let x = Array2::from_shape_vec((1, features.len()), features.to_vec())?;
        self.predict(&x)
    }
}

/// Every model the factory can build
#[derive(Debug, Clone)]
pub enum AnyModel {
    LinearRegression(LinearRegression),
    Knn(KnnModel),
}

impl AnyModel {
    fn inner(&self) -> &dyn Model {
        match self {
            AnyModel::LinearRegression(m) => m,
            AnyModel::Knn(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Model {
        match self {
            AnyModel::LinearRegression(m) => m,
            AnyModel::Knn(m) => m,
        }
    }
}

impl Model for AnyModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.inner().predict(x)
    }

    fn is_fitted(&self) -> bool {
        self.inner().is_fitted()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

impl From<LinearRegression> for AnyModel {
    fn from(model: LinearRegression) -> Self {
        AnyModel::LinearRegression(model)
    }
}

impl From<KnnModel> for AnyModel {
    fn from(model: KnnModel) -> Self {
        AnyModel::Knn(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkbenchError;
    use crate::training::ProblemType;
    use ndarray::array;

    #[test]
    fn test_dispatch_to_variant() {
        let mut model = AnyModel::from(LinearRegression::new());
        assert_eq!(model.name(), "linear_regression");
        assert!(!model.is_fitted());

        model.fit(&array![[0.0], [1.0], [2.0]], &array![1.0, 3.0, 5.0]).unwrap();
        assert!(model.is_fitted());

        let pred = model.predict_one(&[3.0]).unwrap();
        assert!((pred[0] - 7.0).abs() < 1e-8);
    }

    #[test]
    fn test_unfitted_variant_errors() {
        let model = AnyModel::from(KnnModel::new(1, ProblemType::Regression).unwrap());
        assert!(matches!(model.predict_one(&[1.0]), Err(WorkbenchError::NotFitted)));
    }
}
