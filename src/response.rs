use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// `{"success": bool, "data"?: any, "error"?: string}`
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::CREATED, data)
    }

    pub fn with_status(status: StatusCode, data: T) -> ApiResult<T> {
        Ok(Self {
            status,
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

impl JsonApiResponse<()> {
    /// Success without a payload.
    pub fn empty() -> ApiResult<()> {
        Ok(Self {
            status: StatusCode::OK,
            success: true,
            data: None,
            error: None,
        })
    }
}

impl JsonApiResponse<serde_json::Value> {
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub(crate) fn from_error(err: &AppError) -> Self {
        Self::failure(status_for(err), err.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        log_app_error(&self, status);
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    if let AppError::Internal(detail) = err {
        tracing::error!(status = status.as_u16(), error = %detail, "request failed");
    } else if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), error = %err, "request failed");
    }
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        AppError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
