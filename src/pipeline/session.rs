//! Trained-pipeline sessions shared between request handlers

use super::engine::{Pipeline, TrainReport};
use crate::error::{Result, WorkbenchError};
use crate::training::{ModelKind, PipelineConfig, ProblemType};
use crate::visualization::{ArtifactHandle, PredictionPlotter};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use polars::prelude::DataFrame;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// A trained pipeline plus what its training run reported.
///
/// Sessions are immutable once built; retraining produces a new one.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub model_kind: ModelKind,
    pub problem_type: ProblemType,
    pub trained_at: DateTime<Utc>,
    pub report: TrainReport,
    pipeline: Pipeline,
}

impl Session {
    /// Short random session id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }

    /// Build a fresh pipeline and train it on `df`
    pub fn train(
        model_name: &str,
        problem_type: ProblemType,
        config: PipelineConfig,
        df: &DataFrame,
        target: &str,
        plotter: &dyn PredictionPlotter,
    ) -> Result<Self> {
        Self::train_with_id(Self::generate_id(), model_name, problem_type, config, df, target, plotter)
    }

    /// Same as [`Session::train`] with a caller-chosen id, so per-session
    /// resources such as the plot file can be named before training starts
    pub fn train_with_id(
        id: String,
        model_name: &str,
        problem_type: ProblemType,
        config: PipelineConfig,
        df: &DataFrame,
        target: &str,
        plotter: &dyn PredictionPlotter,
    ) -> Result<Self> {
        let mut pipeline = Pipeline::with_config(model_name, problem_type, config)?;
        let report = pipeline.train(df, target, plotter)?;

        Ok(Self {
            id,
            model_kind: pipeline.model_kind(),
            problem_type,
            trained_at: Utc::now(),
            report,
            pipeline,
        })
    }

    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.pipeline.predict(features)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn artifact(&self) -> Option<&ArtifactHandle> {
        self.report.artifact.as_ref()
    }
}

/// Holds the most recently trained session.
///
/// Readers clone the `Arc` and release the lock before predicting, so a
/// concurrent retrain never blocks or tears an in-flight prediction.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session
    pub fn install(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        let previous = self.current.write().replace(Arc::clone(&session));
        info!(
            session_id = %session.id,
            model = %session.model_kind,
            replaced = ?previous.as_ref().map(|s| s.id.as_str()),
            "Installed trained session"
        );
        session
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.read().clone()
    }

    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        let session = self.current().ok_or(WorkbenchError::NotTrained)?;
        session.predict(features)
    }

    /// Artifact of the current session, if one was rendered
    pub fn artifact(&self) -> Option<ArtifactHandle> {
        self.current().and_then(|s| s.artifact().cloned())
    }

    pub fn clear(&self) {
        self.current.write().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualization::NoopPlotter;
    use polars::prelude::*;

    fn train_session(model: &str) -> Session {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            "y" => &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0]
        )
        .unwrap();
        Session::train(
            model,
            ProblemType::Regression,
            PipelineConfig::default(),
            &df,
            "y",
            &NoopPlotter,
        )
        .unwrap()
    }

    #[test]
    fn test_session_id() {
        let session = train_session("linear_regression");
        assert_eq!(session.id.len(), 8);
        assert_eq!(session.model_kind, ModelKind::LinearRegression);
    }

    #[test]
    fn test_train_with_id_keeps_id() {
        let df = df!("a" => &[1.0, 2.0, 3.0, 4.0, 5.0], "y" => &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let session = Session::train_with_id(
            "abcd1234".to_string(),
            "linear_regression",
            ProblemType::Regression,
            PipelineConfig::default(),
            &df,
            "y",
            &NoopPlotter,
        )
        .unwrap();
        assert_eq!(session.id, "abcd1234");
        assert_ne!(Session::generate_id(), Session::generate_id());
    }

    #[test]
    fn test_empty_slot() {
        let slot = SessionSlot::new();
        assert!(slot.current().is_none());
        assert!(slot.artifact().is_none());
        assert!(matches!(slot.predict(&[1.0]), Err(WorkbenchError::NotTrained)));
    }

    #[test]
    fn test_install_replaces_session() {
        let slot = SessionSlot::new();
        let first = slot.install(train_session("linear_regression"));
        let second = slot.install(train_session("knn"));

        let current = slot.current().unwrap();
        assert_eq!(current.id, second.id);
        assert_ne!(current.id, first.id);
        assert_eq!(current.model_kind, ModelKind::Knn);

        // the replaced session stays usable by whoever still holds it
        assert!(first.predict(&[3.0]).is_ok());
    }

    #[test]
    fn test_predict_through_slot() {
        let slot = SessionSlot::new();
        slot.install(train_session("linear_regression"));
        let pred = slot.predict(&[5.0]).unwrap();
        assert!((pred[0] - 10.0).abs() < 1e-6);

        slot.clear();
        assert!(slot.current().is_none());
    }
}
