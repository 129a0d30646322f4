use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed track: {0}")]
    MalformedTrack(String),
    #[error("No track points found in file")]
    EmptyTrack,
    #[error("Unsupported track format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Timestamps go backwards at point {index}: {current} is before {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("Invalid sport type: {0:?} (expected one of course, cyclisme, natation, randonnee)")]
    InvalidSportType(String),
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Motion(#[from] MotionError),
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error("Activity not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Parse(_)
            | AppError::Motion(_)
            | AppError::Activity(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
