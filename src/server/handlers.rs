//! HTTP request handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::ingest;
use crate::pipeline::Session;
use crate::training::ProblemType;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Fields of a multipart training request
#[derive(Default)]
struct TrainForm {
    file_name: Option<String>,
    data: Option<Bytes>,
    model: Option<String>,
    target: Option<String>,
    problem_type: Option<String>,
}

impl TrainForm {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = TrainForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = Some(field.file_name().unwrap_or("upload.csv").to_string());
                    form.data = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| ServerError::BadRequest(e.to_string()))?,
                    );
                }
                "model" | "target" | "problem_type" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ServerError::BadRequest(e.to_string()))?;
                    let slot = match name.as_str() {
                        "model" => &mut form.model,
                        "target" => &mut form.target,
                        _ => &mut form.problem_type,
                    };
                    *slot = Some(value.trim().to_string());
                }
                other => warn!(field = %other, "Ignoring unknown multipart field"),
            }
        }
        Ok(form)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::BadRequest(format!("Missing form field: {}", field)))
}

/// Upload a CSV, train a fresh pipeline on it and make it the current session
pub async fn train(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let form = TrainForm::read(multipart).await?;
    let data = form
        .data
        .ok_or_else(|| ServerError::BadRequest("No file uploaded".to_string()))?;
    let file_name = form.file_name.unwrap_or_else(|| "upload.csv".to_string());
    let model = required(form.model, "model")?;
    let target = required(form.target, "target")?;
    let problem_type: ProblemType = required(form.problem_type, "problem_type")?.parse()?;

    info!(file = %file_name, bytes = data.len(), model = %model, target = %target, "Received training upload");

    let upload_path = state.upload_path(&file_name);
    tokio::fs::create_dir_all(&state.config.data_dir).await?;
    tokio::fs::write(&upload_path, &data).await?;

    let df = ingest::read_csv_bytes(&data)?;
    let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();

    let worker_state = Arc::clone(&state);
    let session = tokio::task::spawn_blocking(move || {
        let session_id = Session::generate_id();
        let plotter = worker_state.plotter_for(&session_id);
        Session::train_with_id(
            session_id,
            &model,
            problem_type,
            worker_state.pipeline_config.clone(),
            &df,
            &target,
            &plotter,
        )
    })
    .await
    .map_err(|e| ServerError::Internal(format!("Training task failed: {}", e)))??;

    let session = state.sessions.install(session);
    let report = &session.report;

    Ok(Json(serde_json::json!({
        "message": "Model trained successfully",
        "session_id": session.id,
        "model": session.model_kind,
        "problem_type": session.problem_type,
        "target": report.target_column,
        "metrics": report.metrics,
        "n_train": report.n_train,
        "n_test": report.n_test,
        "columns": columns,
        "feature_names": report.feature_names,
        "featureCount": report.feature_names.len(),
        "chartData": report.chart_points(),
        "training_time_secs": report.training_time_secs,
        "plot_image_endpoint": report.artifact.as_ref().map(|_| "/api/plot"),
    })))
}

/// Serve the latest rendered plot
pub async fn get_plot(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let not_found = || ServerError::NotFound("Plot not found. Train model first.".to_string());
    let artifact = state.sessions.artifact().ok_or_else(not_found)?;

    let body = match tokio::fs::read(&artifact.path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    Ok(([(header::CONTENT_TYPE, artifact.media_type)], body))
}

#[derive(Deserialize)]
pub struct PredictRequest {
    features: Vec<f64>,
}

/// Predict one feature vector with the current session
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<serde_json::Value>> {
    let prediction = state.sessions.predict(&request.features)?;
    Ok(Json(serde_json::json!({
        "prediction": prediction,
    })))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.sessions.current();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "trained": session.is_some(),
        "session_id": session.as_ref().map(|s| s.id.clone()),
        "trained_at": session.as_ref().map(|s| s.trained_at.to_rfc3339()),
    }))
}
