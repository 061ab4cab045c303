use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::AppError;

pub const INVALID_BODY: &str = "invalid request body";

/// Request bodies that check their own fields. The error is the message for
/// the first field that fails.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// JSON body that has been decoded and validated. Any decoding failure is a
/// plain 400 `invalid request body`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "request body rejected");
                AppError::bad_request(INVALID_BODY)
            })?;

        value.validate().map_err(AppError::bad_request)?;
        Ok(Self(value))
    }
}

/// The `{id}` / `{class_id}` path segment, parsed as a class id.
pub struct ClassId(pub Uuid);

impl<S> FromRequestParts<S> for ClassId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("invalid class id"))?;

        Uuid::parse_str(&raw)
            .map(Self)
            .map_err(|_| AppError::bad_request("invalid class id"))
    }
}
