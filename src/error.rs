use crate::services::ServiceError;

pub const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    MethodNotAllowed(String),
    RequestTimeout(String),
    Conflict(String),
    ServiceUnavailable(String),
    /// Carries the detail for the log; clients only see [`INTERNAL_MESSAGE`].
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Text that goes into the response body.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::MethodNotAllowed(message)
            | Self::RequestTimeout(message)
            | Self::Conflict(message)
            | Self::ServiceUnavailable(message) => message.as_str(),
            Self::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(detail) => write!(f, "{INTERNAL_MESSAGE}: {detail}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Validation(_) => AppError::bad_request(message),
            ServiceError::InvalidCredentials | ServiceError::InvalidToken => {
                AppError::unauthorized(message)
            }
            ServiceError::NotClassOwner => AppError::forbidden(message),
            ServiceError::ClassNotFound | ServiceError::NotEnrolled => {
                AppError::not_found(message)
            }
            ServiceError::EmailTaken | ServiceError::AlreadyEnrolled => {
                AppError::conflict(message)
            }
            ServiceError::CodeGeneration
            | ServiceError::Repository { .. }
            | ServiceError::PasswordHash(_)
            | ServiceError::TokenSigning(_) => AppError::internal(message),
        }
    }
}
