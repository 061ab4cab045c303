use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, middleware};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

use super::{auth, classes, enrollments, health};

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(API_PREFIX, api_router(state.clone()))
        .merge(health::router(state))
}

/// The router wrapped in the cross-cutting layers: per-request deadline,
/// JSON error envelope, panic capture and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    let timeout = state.config.request_timeout();
    with_layers(router(state), timeout)
}

fn with_layers(router: Router, timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}

fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .merge(classes::router(state.clone()))
        .merge(enrollments::router(state))
}
