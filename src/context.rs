use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Per-request caller identity, passed explicitly to every handler that needs it.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub owner_id: i64,
    pub request_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", USER_ID_HEADER)))?;

        let owner_id = raw
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {} header", USER_ID_HEADER)))?;

        Ok(Self {
            owner_id,
            request_id: Uuid::new_v4(),
        })
    }
}
