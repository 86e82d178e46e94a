//! K-Nearest Neighbors implementation
//!
//! One lazy learner serves both problem types: classification takes the
//! majority label of the `k` closest training rows, regression their mean.

use super::models::Model;
use super::ProblemType;
use crate::error::{Result, WorkbenchError};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Neighbor count used by the model factory
pub const DEFAULT_NEIGHBORS: usize = 3;

/// K-Nearest Neighbors classifier/regressor
#[derive(Debug, Clone)]
pub struct KnnModel {
    k: usize,
    problem_type: ProblemType,
    x_train: Option<Array2<f64>>,
    y_train: Option<Array1<f64>>,
}

impl KnnModel {
    /// Create an unfitted model. `k` must be positive.
    pub fn new(k: usize, problem_type: ProblemType) -> Result<Self> {
        if k == 0 {
            return Err(WorkbenchError::InvalidK { k, n_samples: 0 });
        }
        Ok(Self {
            k,
            problem_type,
            x_train: None,
            y_train: None,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Number of stored training rows
    pub fn n_samples(&self) -> usize {
        self.x_train.as_ref().map_or(0, |x| x.nrows())
    }

    fn check_k(&self, n_samples: usize) -> Result<()> {
        if self.k == 0 || self.k > n_samples {
            return Err(WorkbenchError::InvalidK {
                k: self.k,
                n_samples,
            });
        }
        Ok(())
    }

    fn aggregate(&self, targets: &[f64]) -> f64 {
        match self.problem_type {
            ProblemType::Classification => majority_label(targets),
            ProblemType::Regression => targets.iter().sum::<f64>() / targets.len() as f64,
        }
    }
}

impl Model for KnnModel {
    /// Store the training data; nothing is computed until prediction
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(WorkbenchError::shape(
                format!("y length = {}", x.nrows()),
                format!("y length = {}", y.len()),
            ));
        }
        self.check_k(x.nrows())?;
        if x.iter().any(|v| !v.is_finite()) {
            return Err(WorkbenchError::NonFiniteValue("features".to_string()));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(WorkbenchError::NonFiniteValue("target".to_string()));
        }

        self.x_train = Some(x.clone());
        self.y_train = Some(y.clone());
        Ok(())
    }

    /// Predict every query row (parallelized over rows, order preserved)
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (x_train, y_train) = match (&self.x_train, &self.y_train) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(WorkbenchError::NotFitted),
        };
        self.check_k(x_train.nrows())?;
        if x.ncols() != x_train.ncols() {
            return Err(WorkbenchError::shape(
                format!("{} features", x_train.ncols()),
                format!("{} features", x.ncols()),
            ));
        }

        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| {
                let targets = k_nearest_targets(x.row(i), x_train, y_train, self.k);
                self.aggregate(&targets)
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    fn is_fitted(&self) -> bool {
        self.x_train.is_some()
    }

    fn name(&self) -> &'static str {
        "knn"
    }
}

fn euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(ai, bi)| {
            let d = ai - bi;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Targets of the `k` closest training rows. The sort is stable, so equal
/// distances keep ascending training-row order.
fn k_nearest_targets(
    point: ArrayView1<f64>,
    x_train: &Array2<f64>,
    y_train: &Array1<f64>,
    k: usize,
) -> Vec<f64> {
    let mut distances: Vec<(usize, f64)> = x_train
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| (i, euclidean(point, row)))
        .collect();

    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    distances
        .into_iter()
        .take(k)
        .map(|(i, _)| y_train[i])
        .collect()
}

/// Most frequent label; a tie goes to the lowest label value
fn majority_label(labels: &[f64]) -> f64 {
    let mut sorted = labels.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best = sorted[0];
    let mut best_count = 0;
    let mut start = 0;
    while start < sorted.len() {
        let label = sorted[start];
        let end = sorted[start..]
            .iter()
            .position(|v| v.total_cmp(&label) != Ordering::Equal)
            .map_or(sorted.len(), |offset| start + offset);
        let count = end - start;
        if count > best_count {
            best = label;
            best_count = count;
        }
        start = end;
    }
    best
}
