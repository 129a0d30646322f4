use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::pipeline::{self, mapper, process};
use crate::state::AppState;
use crate::types::activity::{Activity, ActivityInput};
use crate::types::metrics::MetricsSummary;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/activities/upload", post(upload))
}

#[derive(Serialize)]
struct UploadResponse {
    activity: Activity,
    summary: MetricsSummary,
}

async fn upload(
    State(state): State<AppState>,
    ctx: RequestContext,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut input = ActivityInput::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            file_bytes = Some(field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file bytes: {}", e))
            })?.to_vec());
            continue;
        }

        let value = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field {}: {}", name, e))
        })?;

        match name.as_str() {
            "title" => input.title = value,
            "sport" => input.sport = value,
            "date" => input.date = parse_optional_date(&value)?,
            "location" => input.location = Some(value),
            "description" => input.description = Some(value),
            "distance_km" => input.distance_km = parse_number("distance_km", &value)?,
            "duration_hours" => input.duration_hours = parse_number("duration_hours", &value)?,
            "sport_detail" => input.sport_detail = Some(value),
            _ => tracing::debug!("Ignoring unknown upload field {}", name),
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename.ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

    let min_speed = state.config.min_moving_speed_mps;
    let task_filename = filename.clone();
    let analysis = tokio::task::spawn_blocking(move || pipeline::analyze(&task_filename, &bytes, min_speed))
        .await
        .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))??;

    if input.title.trim().is_empty() {
        if let Some(name) = &analysis.track.name {
            input.title = name.clone();
        }
    }

    let activity = mapper::map_activity(ctx.owner_id, input, Some(&analysis.metrics))?;
    let summary = process::summarize(&analysis.track, &analysis.metrics);

    state.store.insert(activity.clone());

    tracing::info!(
        request_id = %ctx.request_id,
        "Created activity {} for owner {} from {} ({} points, {:.2} km)",
        activity.id,
        ctx.owner_id,
        filename,
        analysis.metrics.point_count,
        activity.distance_km
    );

    Ok((StatusCode::CREATED, Json(UploadResponse { activity, summary })))
}

fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid date {:?}, expected YYYY-MM-DD", value)))
}

fn parse_number(field: &str, value: &str) -> Result<Option<f64>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid number for {}: {:?}", field, value)))
}
