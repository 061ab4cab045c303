use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{auth::AuthUser, error::AppError, state::AppState};

/// Bearer-token gate. On success the caller's [`AuthUser`] is stored in the
/// request extensions for handlers and the role layer.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(&req).map_err(IntoResponse::into_response)?;

    let claims = state
        .services
        .auth()
        .validate_token(token)
        .map_err(|err| AppError::from(err).into_response())?;

    req.extensions_mut().insert(AuthUser::from(&claims));

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<&str, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("authorization header required"))?;

    let (_, token) = value
        .to_str()
        .ok()
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .ok_or_else(|| AppError::unauthorized("invalid authorization header format"))?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("token required"));
    }
    Ok(token)
}
