//! Training pipeline: clean, scale, split, fit, evaluate

use crate::error::{Result, WorkbenchError};
use crate::preprocessing::{is_numeric_dtype, Preprocessor};
use crate::training::{
    AnyModel, Evaluator, Metrics, Model, ModelFactory, ModelKind, PipelineConfig, ProblemType,
};
use crate::visualization::{ArtifactHandle, PredictionPlotter};
use ndarray::{s, Array1, Array2};
use polars::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One point of the held-out comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub index: usize,
    pub actual: f64,
    pub predicted: f64,
}

/// Outcome of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub metrics: Metrics,
    pub artifact: Option<ArtifactHandle>,
    pub target_column: String,
    pub feature_names: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    /// Targets of the evaluation split
    pub actual: Vec<f64>,
    /// Model output for the evaluation split
    pub predicted: Vec<f64>,
    pub training_time_secs: f64,
}

impl TrainReport {
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.actual
            .iter()
            .zip(self.predicted.iter())
            .enumerate()
            .map(|(index, (&actual, &predicted))| ChartPoint {
                index,
                actual,
                predicted,
            })
            .collect()
    }
}

/// Owns one preprocessor and one model for their whole train/predict life
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    model_kind: ModelKind,
    problem_type: ProblemType,
    preprocessor: Preprocessor,
    model: AnyModel,
    feature_names: Vec<String>,
    target_column: Option<String>,
    is_trained: bool,
}

impl Pipeline {
    /// Create an untrained pipeline for a named model
    pub fn new(model_name: &str, problem_type: ProblemType) -> Result<Self> {
        Self::with_config(model_name, problem_type, PipelineConfig::default())
    }

    pub fn with_config(
        model_name: &str,
        problem_type: ProblemType,
        config: PipelineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let model_kind: ModelKind = model_name.parse()?;
        let model = ModelFactory::build(model_kind, problem_type)?;

        Ok(Self {
            config,
            model_kind,
            problem_type,
            preprocessor: Preprocessor::new(),
            model,
            feature_names: Vec::new(),
            target_column: None,
            is_trained: false,
        })
    }

    /// Fit on `df` and score the model on the trailing rows.
    ///
    /// Every column except `target` is a feature, in frame order. Rows are
    /// never shuffled: the first `floor(train_ratio * n)` rows train the model
    /// and the rest evaluate it.
    pub fn train(
        &mut self,
        df: &DataFrame,
        target: &str,
        plotter: &dyn PredictionPlotter,
    ) -> Result<TrainReport> {
        let start = Instant::now();
        self.is_trained = false;

        info!(
            model = %self.model_kind,
            problem_type = %self.problem_type,
            rows = df.height(),
            columns = df.width(),
            target = target,
            "Starting training"
        );

        let cleaned = self.preprocessor.clean(df)?;
        let (x, y, feature_names) = split_features_target(&cleaned, target)?;

        let n = x.nrows();
        let split = self.config.split_index(n);
        if split == 0 || split >= n {
            return Err(WorkbenchError::InsufficientData(format!(
                "{} rows leave an empty train or test split (train ratio {})",
                n, self.config.train_ratio
            )));
        }

        let x = self.preprocessor.scale(&x)?;

        let x_train = x.slice(s![..split, ..]).to_owned();
        let x_test = x.slice(s![split.., ..]).to_owned();
        let y_train = y.slice(s![..split]).to_owned();
        let y_test = y.slice(s![split..]).to_owned();
        debug!(n_train = split, n_test = n - split, features = feature_names.len(), "Split data");

        self.model.fit(&x_train, &y_train)?;
        let y_pred = self.model.predict(&x_test)?;
        let metrics = Evaluator::evaluate(&y_test, &y_pred, self.problem_type)?;

        let artifact = match plotter.render(&y_test, &y_pred) {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(error = %e, "Failed to render prediction plot");
                None
            }
        };

        self.feature_names = feature_names.clone();
        self.target_column = Some(target.to_string());
        self.is_trained = true;

        let training_time_secs = start.elapsed().as_secs_f64();
        info!(
            model = %self.model_kind,
            metrics = ?metrics,
            elapsed_secs = training_time_secs,
            "Training completed"
        );

        Ok(TrainReport {
            metrics,
            artifact,
            target_column: target.to_string(),
            feature_names,
            n_train: split,
            n_test: n - split,
            actual: y_test.to_vec(),
            predicted: y_pred.to_vec(),
            training_time_secs,
        })
    }

    /// Predict one raw feature vector with the fitted scale and model
    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        let x = Array2::from_shape_vec((1, features.len()), features.to_vec())?;
        self.predict_batch(&x)
    }

    /// Predict several raw feature rows at once
    pub fn predict_batch(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if !self.is_trained {
            return Err(WorkbenchError::NotTrained);
        }
        if x.ncols() != self.feature_names.len() {
            return Err(WorkbenchError::shape(
                format!("{} features ({})", self.feature_names.len(), self.feature_names.join(", ")),
                format!("{} features", x.ncols()),
            ));
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(WorkbenchError::NonFiniteValue("features".to_string()));
        }

        let scaled = self.preprocessor.transform(x)?;
        Ok(self.model.predict(&scaled)?.to_vec())
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn model_kind(&self) -> ModelKind {
        self.model_kind
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Feature column order the model was trained with
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_column(&self) -> Option<&str> {
        self.target_column.as_deref()
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &AnyModel {
        &self.model
    }
}

/// Split a cleaned frame into the feature matrix, the target vector and the
/// ordered feature names
fn split_features_target(
    df: &DataFrame,
    target: &str,
) -> Result<(Array2<f64>, Array1<f64>, Vec<String>)> {
    let target_column = df
        .column(target)
        .map_err(|_| WorkbenchError::ColumnNotFound(target.to_string()))?;
    let y = Array1::from_vec(numeric_values(target_column)?);

    let mut feature_names = Vec::new();
    let mut col_data = Vec::new();
    for column in df.get_columns() {
        if column.name().as_str() == target {
            continue;
        }
        col_data.push(numeric_values(column)?);
        feature_names.push(column.name().to_string());
    }

    if col_data.is_empty() {
        return Err(WorkbenchError::InsufficientData(
            "dataset has no feature columns besides the target".to_string(),
        ));
    }

    let n_rows = df.height();
    let x = Array2::from_shape_fn((n_rows, col_data.len()), |(r, c)| col_data[c][r]);

    Ok((x, y, feature_names))
}

fn numeric_values(column: &Column) -> Result<Vec<f64>> {
    if !is_numeric_dtype(column.dtype()) {
        return Err(WorkbenchError::NonNumericColumn(column.name().to_string()));
    }
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;
    let values: Vec<f64> = ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    // cleaned frames carry no missing cells, so anything non-finite here is an inf
    if values.iter().any(|v| !v.is_finite()) {
        return Err(WorkbenchError::NonFiniteValue(column.name().to_string()));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualization::NoopPlotter;

    fn linear_df(n: usize) -> DataFrame {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        df!("x" => x, "y" => y).unwrap()
    }

    #[test]
    fn test_train_regression_split() {
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        let report = pipeline.train(&linear_df(10), "y", &NoopPlotter).unwrap();

        assert_eq!(report.n_train, 8);
        assert_eq!(report.n_test, 2);
        assert_eq!(report.actual, vec![17.0, 19.0]);
        assert!(report.metrics.mse().unwrap() < 1e-10);
        assert!(report.artifact.is_none());
        assert_eq!(report.chart_points().len(), 2);
    }

    #[test]
    fn test_predict_uses_training_scale() {
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        pipeline.train(&linear_df(10), "y", &NoopPlotter).unwrap();

        // outside the training range on purpose
        let pred = pipeline.predict(&[20.0]).unwrap();
        assert!((pred[0] - 41.0).abs() < 1e-6);
    }

    #[test]
    fn test_predict_before_train() {
        let pipeline = Pipeline::new("knn", ProblemType::Classification).unwrap();
        assert!(matches!(pipeline.predict(&[1.0]), Err(WorkbenchError::NotTrained)));
    }

    #[test]
    fn test_predict_wrong_width() {
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        pipeline.train(&linear_df(10), "y", &NoopPlotter).unwrap();
        let err = pipeline.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, WorkbenchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_predict_rejects_non_finite_input() {
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        pipeline.train(&linear_df(10), "y", &NoopPlotter).unwrap();
        let err = pipeline.predict(&[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, WorkbenchError::NonFiniteValue(_)));
    }

    #[test]
    fn test_missing_target() {
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        let err = pipeline.train(&linear_df(10), "price", &NoopPlotter).unwrap_err();
        assert!(matches!(err, WorkbenchError::ColumnNotFound(ref c) if c == "price"));
    }

    #[test]
    fn test_non_numeric_feature() {
        let df = df!(
            "city" => &["a", "b", "c", "d", "e"],
            "y" => &[1.0, 2.0, 3.0, 4.0, 5.0]
        )
        .unwrap();
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        let err = pipeline.train(&df, "y", &NoopPlotter).unwrap_err();
        assert!(matches!(err, WorkbenchError::NonNumericColumn(ref c) if c == "city"));
    }

    #[test]
    fn test_infinite_feature_rejected() {
        let df = df!(
            "a" => &[1.0, 2.0, f64::INFINITY, 4.0, 5.0],
            "y" => &[1.0, 2.0, 3.0, 4.0, 5.0]
        )
        .unwrap();
        for model in ["linear_regression", "knn"] {
            let mut pipeline = Pipeline::new(model, ProblemType::Regression).unwrap();
            let err = pipeline.train(&df, "y", &NoopPlotter).unwrap_err();
            assert!(matches!(err, WorkbenchError::NonFiniteValue(ref c) if c == "a"));
            assert!(!pipeline.is_trained());
        }
    }

    #[test]
    fn test_too_few_rows() {
        let mut pipeline = Pipeline::new("linear_regression", ProblemType::Regression).unwrap();
        let err = pipeline.train(&linear_df(1), "y", &NoopPlotter).unwrap_err();
        assert!(matches!(err, WorkbenchError::InsufficientData(_)));
    }

    #[test]
    fn test_knn_needs_enough_training_rows() {
        // 3 rows -> 2 train rows, fewer than k = 3
        let mut pipeline = Pipeline::new("knn", ProblemType::Regression).unwrap();
        let err = pipeline.train(&linear_df(3), "y", &NoopPlotter).unwrap_err();
        assert!(matches!(err, WorkbenchError::InvalidK { k: 3, n_samples: 2 }));
        assert!(!pipeline.is_trained());
    }

    #[test]
    fn test_unknown_model_name() {
        assert!(matches!(
            Pipeline::new("svm", ProblemType::Regression),
            Err(WorkbenchError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_custom_train_ratio() {
        let config = PipelineConfig::new().with_train_ratio(0.5);
        let mut pipeline = Pipeline::with_config("linear_regression", ProblemType::Regression, config).unwrap();
        let report = pipeline.train(&linear_df(10), "y", &NoopPlotter).unwrap();
        assert_eq!((report.n_train, report.n_test), (5, 5));
    }
}
