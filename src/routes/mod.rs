pub mod activities;
pub mod health;
pub mod tracks;
pub mod upload;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(tracks::router())
        .merge(upload::router())
        .merge(activities::router())
}
