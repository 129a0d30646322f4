use axum::extract::{Multipart, State};
use axum::{routing::post, Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::pipeline::{self, process};
use crate::state::AppState;
use crate::types::metrics::MetricsSummary;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/tracks/analyze", post(analyze))
}

#[derive(Serialize)]
struct AnalyzeResult {
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<MetricsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<AnalyzeResult>>, AppError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        if files.len() >= state.config.max_batch_files {
            return Err(AppError::BadRequest(format!(
                "At most {} files per request",
                state.config.max_batch_files
            )));
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;
        let bytes = field.bytes().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read file bytes: {}", e))
        })?;
        files.push((filename, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No file provided".to_string()));
    }

    let min_speed = state.config.min_moving_speed_mps;
    let analyses = tokio::task::spawn_blocking(move || pipeline::analyze_batch(files, min_speed))
        .await
        .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))?;

    let results = analyses
        .into_iter()
        .map(|(filename, result)| match result {
            Ok(analysis) => AnalyzeResult {
                filename,
                summary: Some(process::summarize(&analysis.track, &analysis.metrics)),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Could not analyze {}: {}", filename, e);
                AnalyzeResult {
                    filename,
                    summary: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    Ok(Json(results))
}
