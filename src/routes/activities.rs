use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::pipeline::mapper;
use crate::state::AppState;
use crate::types::activity::{Activity, ActivityInput, ActivityPatch};
use crate::types::stats::OwnerStats;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/activities", get(list).post(create))
        .route("/api/activities/stats", get(stats))
        .route(
            "/api/activities/:id",
            get(fetch).patch(edit).delete(remove),
        )
}

async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<ActivityInput>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let activity = mapper::map_activity(ctx.owner_id, input, None)?;
    state.store.insert(activity.clone());

    tracing::info!(
        request_id = %ctx.request_id,
        "Created manual {} activity {} for owner {}",
        activity.sport,
        activity.id,
        ctx.owner_id
    );

    Ok((StatusCode::CREATED, Json(activity)))
}

async fn list(State(state): State<AppState>, ctx: RequestContext) -> Json<Vec<Activity>> {
    Json(state.store.list_for_owner(ctx.owner_id))
}

async fn stats(State(state): State<AppState>, ctx: RequestContext) -> Json<OwnerStats> {
    let activities = state.store.list_for_owner(ctx.owner_id);
    Json(OwnerStats::from_activities(ctx.owner_id, &activities))
}

async fn fetch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Activity>, AppError> {
    let activity = state
        .store
        .get(id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;

    if activity.owner_id != ctx.owner_id {
        return Err(AppError::Forbidden(format!("activity {} belongs to another user", id)));
    }

    Ok(Json(activity))
}

async fn edit(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(patch): Json<ActivityPatch>,
) -> Result<Json<Activity>, AppError> {
    let updated = state
        .store
        .update(id, ctx.owner_id, |current| Ok(mapper::apply_patch(current, patch)?))?;

    tracing::info!(request_id = %ctx.request_id, "Updated activity {}", id);
    Ok(Json(updated))
}

async fn remove(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.remove(id, ctx.owner_id)?;

    tracing::info!(request_id = %ctx.request_id, "Deleted activity {}", id);
    Ok(StatusCode::NO_CONTENT)
}
