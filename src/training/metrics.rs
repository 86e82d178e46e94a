//! Evaluation metrics

use super::ProblemType;
use crate::error::{Result, WorkbenchError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics of one training run, tagged by problem type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Metrics {
    Classification {
        /// Fraction of exactly matching labels
        accuracy: f64,
    },
    Regression {
        /// Mean squared error
        mse: f64,
        /// Mean absolute error
        mae: f64,
    },
}

impl Metrics {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            Metrics::Classification { .. } => ProblemType::Classification,
            Metrics::Regression { .. } => ProblemType::Regression,
        }
    }

    pub fn accuracy(&self) -> Option<f64> {
        match self {
            Metrics::Classification { accuracy } => Some(*accuracy),
            Metrics::Regression { .. } => None,
        }
    }

    pub fn mse(&self) -> Option<f64> {
        match self {
            Metrics::Regression { mse, .. } => Some(*mse),
            Metrics::Classification { .. } => None,
        }
    }

    pub fn mae(&self) -> Option<f64> {
        match self {
            Metrics::Regression { mae, .. } => Some(*mae),
            Metrics::Classification { .. } => None,
        }
    }
}

/// Stateless metric computation
pub struct Evaluator;

impl Evaluator {
    /// Compare true and predicted values. Classification labels must be
    /// encoded identically on both sides: equality is exact.
    pub fn evaluate(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
        problem_type: ProblemType,
    ) -> Result<Metrics> {
        if y_true.len() != y_pred.len() {
            return Err(WorkbenchError::shape(
                format!("{} predictions", y_true.len()),
                format!("{} predictions", y_pred.len()),
            ));
        }
        if y_true.is_empty() {
            return Err(WorkbenchError::InsufficientData(
                "cannot evaluate an empty prediction set".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let metrics = match problem_type {
            ProblemType::Classification => {
                let correct = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .filter(|(t, p)| t == p)
                    .count();
                Metrics::Classification {
                    accuracy: correct as f64 / n,
                }
            }
            ProblemType::Regression => {
                let (sq, abs) = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| t - p)
                    .fold((0.0, 0.0), |(sq, abs), e| (sq + e * e, abs + e.abs()));
                Metrics::Regression {
                    mse: sq / n,
                    mae: abs / n,
                }
            }
        };

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_classification() {
        let m = Evaluator::evaluate(&array![1.0, 1.0, 1.0], &array![1.0, 1.0, 1.0], ProblemType::Classification).unwrap();
        assert_eq!(m, Metrics::Classification { accuracy: 1.0 });
    }

    #[test]
    fn test_partial_classification() {
        let m = Evaluator::evaluate(&array![0.0, 1.0, 2.0, 1.0], &array![0.0, 2.0, 2.0, 0.0], ProblemType::Classification).unwrap();
        assert_eq!(m.accuracy(), Some(0.5));
        assert_eq!(m.mse(), None);
    }

    #[test]
    fn test_regression_exact() {
        let m = Evaluator::evaluate(&array![1.0, 2.0, 3.0], &array![1.0, 2.0, 3.0], ProblemType::Regression).unwrap();
        assert_eq!(m, Metrics::Regression { mse: 0.0, mae: 0.0 });
    }

    #[test]
    fn test_regression_offset_by_one() {
        let m = Evaluator::evaluate(&array![1.0, 2.0, 3.0], &array![2.0, 3.0, 4.0], ProblemType::Regression).unwrap();
        assert_eq!(m, Metrics::Regression { mse: 1.0, mae: 1.0 });
        assert_eq!(m.problem_type(), ProblemType::Regression);
    }

    #[test]
    fn test_length_mismatch() {
        let err = Evaluator::evaluate(&array![1.0, 2.0], &array![1.0], ProblemType::Regression).unwrap_err();
        assert!(matches!(err, WorkbenchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_metrics_json_tag() {
        let json = serde_json::to_value(Metrics::Regression { mse: 1.0, mae: 0.5 }).unwrap();
        assert_eq!(json["type"], "regression");
        assert_eq!(json["mse"], 1.0);

        let json = serde_json::to_value(Metrics::Classification { accuracy: 0.75 }).unwrap();
        assert_eq!(json["type"], "classification");
    }
}
