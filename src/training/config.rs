//! Training configuration

use crate::error::{Result, WorkbenchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of ML task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    /// Discrete labels: majority vote, accuracy
    Classification,
    /// Continuous targets: mean aggregation, error magnitudes
    Regression,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Classification => "classification",
            ProblemType::Regression => "regression",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" => Ok(ProblemType::Classification),
            "regression" => Ok(ProblemType::Regression),
            other => Err(WorkbenchError::UnsupportedProblemType(other.to_string())),
        }
    }
}

/// Model families the factory can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Closed-form least squares
    LinearRegression,
    /// K-nearest neighbors
    Knn,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "linear_regression",
            ModelKind::Knn => "knn",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear_regression" => Ok(ModelKind::LinearRegression),
            "knn" => Ok(ModelKind::Knn),
            other => Err(WorkbenchError::UnsupportedModel(other.to_string())),
        }
    }
}

/// Configuration for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fraction of rows (taken in order, never shuffled) used for fitting.
    /// The remaining rows form the evaluation split.
    pub train_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { train_ratio: 0.8 }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the train fraction
    pub fn with_train_ratio(mut self, train_ratio: f64) -> Self {
        self.train_ratio = train_ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(WorkbenchError::InvalidParameter {
                name: "train_ratio".to_string(),
                value: self.train_ratio.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }
        Ok(())
    }

    /// Row index where the evaluation split starts
    pub fn split_index(&self, n_rows: usize) -> usize {
        (self.train_ratio * n_rows as f64).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_problem_type() {
        assert_eq!("classification".parse::<ProblemType>().unwrap(), ProblemType::Classification);
        assert_eq!(" Regression ".parse::<ProblemType>().unwrap(), ProblemType::Regression);
        assert!(matches!(
            "clustering".parse::<ProblemType>(),
            Err(WorkbenchError::UnsupportedProblemType(_))
        ));
    }

    #[test]
    fn test_parse_model_kind() {
        assert_eq!("knn".parse::<ModelKind>().unwrap(), ModelKind::Knn);
        assert!(matches!(
            "random_forest".parse::<ModelKind>(),
            Err(WorkbenchError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_problem_type_serialize() {
        let json = serde_json::to_string(&ProblemType::Regression).unwrap();
        assert_eq!(json, "\"regression\"");
    }

    #[test]
    fn test_split_index() {
        let config = PipelineConfig::default();
        assert_eq!(config.split_index(10), 8);
        assert_eq!(config.split_index(7), 5);
        assert_eq!(config.split_index(0), 0);
    }

    #[test]
    fn test_validate_ratio() {
        assert!(PipelineConfig::new().validate().is_ok());
        assert!(PipelineConfig::new().with_train_ratio(1.0).validate().is_err());
        assert!(PipelineConfig::new().with_train_ratio(f64::NAN).validate().is_err());
    }
}
