//! Error types for the workbench

use thiserror::Error;

/// Result type alias for workbench operations
pub type Result<T> = std::result::Result<T, WorkbenchError>;

/// Main error type for the pipeline, its models and its collaborators
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Unsupported problem type: {0}")]
    UnsupportedProblemType(String),

    #[error("Model not fitted")]
    NotFitted,

    #[error("No model trained yet. Please train a model first.")]
    NotTrained,

    #[error("Invalid k: {k} (training samples: {n_samples})")]
    InvalidK { k: usize, n_samples: usize },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Scale parameters undefined: call scale before transform")]
    UndefinedScale,

    #[error("All values missing in column: {0}")]
    AllValuesMissing(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column is not numeric: {0}")]
    NonNumericColumn(String),

    #[error("Non-finite value in column: {0}")]
    NonFiniteValue(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WorkbenchError {
    /// Shorthand for shape errors built from two displayable descriptions
    pub fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        WorkbenchError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            WorkbenchError::ComputationError(_) | WorkbenchError::IoError(_)
        )
    }
}

impl From<polars::error::PolarsError> for WorkbenchError {
    fn from(err: polars::error::PolarsError) -> Self {
        WorkbenchError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for WorkbenchError {
    fn from(err: ndarray::ShapeError) -> Self {
        WorkbenchError::ShapeMismatch {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
