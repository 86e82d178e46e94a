//! ML Workbench - upload, train and predict with small tabular models
//!
//! A CSV table goes in, a trained model comes out, and the same preprocessing
//! state is reused for every later prediction.
//!
//! # Modules
//!
//! ## Core ML Modules
//! - [`preprocessing`] - Mean imputation and min-max scaling
//! - [`training`] - Models (linear regression, k-NN), factory and evaluation
//! - [`pipeline`] - Train/predict orchestration and trained sessions
//!
//! ## Data and Output
//! - [`ingest`] - CSV loading into polars frames
//! - [`visualization`] - Actual vs predicted plots
//!
//! ## Services
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core ML modules
pub mod preprocessing;
pub mod training;
pub mod pipeline;

// Data and output
pub mod ingest;
pub mod visualization;

// Services
pub mod server;
pub mod cli;

pub use error::{Result, WorkbenchError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, WorkbenchError};

    // Preprocessing
    pub use crate::preprocessing::{Preprocessor, ScaleParams};

    // Training
    pub use crate::training::{
        AnyModel, Evaluator, KnnModel, LinearRegression, Metrics, Model, ModelFactory, ModelKind,
        PipelineConfig, ProblemType,
    };

    // Orchestration
    pub use crate::pipeline::{Pipeline, Session, SessionSlot, TrainReport};

    // Ingestion
    pub use crate::ingest::{read_csv_bytes, read_csv_path, CsvLoader};

    // Visualization
    pub use crate::visualization::{ArtifactHandle, NoopPlotter, PredictionPlotter, SvgPlotter};
}
