use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{auth::AuthUser, error::AppError};

// Reads the identity placed by `require_auth`; routes without it get 401.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("unauthorized"))
    }
}
