use std::sync::Arc;

use axum::{Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::{
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthStatus> {
    if let Err(err) = state.health.ping().await {
        warn!(error = %err, "health check failed");
        return Err(AppError::service_unavailable("database unavailable"));
    }
    JsonApiResponse::ok(HealthStatus { status: "ok" })
}
