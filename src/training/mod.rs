//! Model training module
//!
//! Provides the model abstraction and its implementations:
//! - Linear regression (closed-form least squares via pseudo-inverse)
//! - K-Nearest Neighbors (classification and regression)
//!
//! plus the factory that builds them by name and the evaluator that scores
//! their held-out predictions.

mod config;
mod factory;
mod metrics;
mod models;
pub mod knn;
pub mod linear_models;

pub use config::{ModelKind, PipelineConfig, ProblemType};
pub use factory::ModelFactory;
pub use knn::{KnnModel, DEFAULT_NEIGHBORS};
pub use linear_models::LinearRegression;
pub use metrics::{Evaluator, Metrics};
pub use models::{AnyModel, Model};
