//! Model construction by name

use super::knn::{KnnModel, DEFAULT_NEIGHBORS};
use super::linear_models::LinearRegression;
use super::models::AnyModel;
use super::{ModelKind, ProblemType};
use crate::error::Result;

pub struct ModelFactory;

impl ModelFactory {
    /// Build an unfitted model from its name (`"linear_regression"` or
    /// `"knn"`). Linear regression ignores the problem type; k-NN uses it to
    /// pick vote or mean aggregation.
    pub fn create(model_name: &str, problem_type: ProblemType) -> Result<AnyModel> {
        let kind: ModelKind = model_name.parse()?;
        Self::build(kind, problem_type)
    }

    pub fn build(kind: ModelKind, problem_type: ProblemType) -> Result<AnyModel> {
        let model: AnyModel = match kind {
            ModelKind::LinearRegression => LinearRegression::new().into(),
            ModelKind::Knn => KnnModel::new(DEFAULT_NEIGHBORS, problem_type)?.into(),
        };
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkbenchError;

    #[test]
    fn test_creates_linear_regression() {
        let model = ModelFactory::create("linear_regression", ProblemType::Classification).unwrap();
        assert!(matches!(model, AnyModel::LinearRegression(_)));
    }

    #[test]
    fn test_creates_knn_with_problem_type() {
        match ModelFactory::create("knn", ProblemType::Classification).unwrap() {
            AnyModel::Knn(knn) => {
                assert_eq!(knn.k(), 3);
                assert_eq!(knn.problem_type(), ProblemType::Classification);
            }
            other => panic!("expected knn, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_model() {
        let err = ModelFactory::create("bogus", ProblemType::Regression).unwrap_err();
        assert!(matches!(err, WorkbenchError::UnsupportedModel(ref name) if name == "bogus"));
    }
}
