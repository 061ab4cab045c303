use crate::auth::password::PasswordError;
use crate::db::dao::DaoLayerError;

/// Domain failures. Only the HTTP adapter knows which status each one gets.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("class not found")]
    ClassNotFound,
    #[error("not the owner of this class")]
    NotClassOwner,
    #[error("failed to generate unique class code")]
    CodeGeneration,
    #[error("already enrolled in this class")]
    AlreadyEnrolled,
    #[error("not enrolled in this class")]
    NotEnrolled,
    #[error("{context}: {source}")]
    Repository {
        context: &'static str,
        #[source]
        source: DaoLayerError,
    },
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("token signing failed: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),
}

impl ServiceError {
    pub fn repository(context: &'static str) -> impl FnOnce(DaoLayerError) -> Self {
        move |source| ServiceError::Repository { context, source }
    }

    /// Whether the failure is the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ServiceError::CodeGeneration
                | ServiceError::Repository { .. }
                | ServiceError::PasswordHash(_)
                | ServiceError::TokenSigning(_)
        )
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Length => ServiceError::Validation(err.to_string()),
            PasswordError::Hash(detail) => ServiceError::PasswordHash(detail),
        }
    }
}
