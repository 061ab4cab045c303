use sea_orm::{DbErr, SqlErr};
use std::fmt;

#[derive(Debug)]
pub enum DaoLayerError {
    Db(DbErr),
    NotFound { entity: &'static str, key: String },
    DuplicateKey { entity: &'static str },
    Decode { entity: &'static str, detail: String },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    pub fn not_found(entity: &'static str, key: impl fmt::Display) -> Self {
        DaoLayerError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Unique violations are told apart through SeaORM's vendor-neutral
    /// classification; everything else stays a raw `DbErr`.
    pub fn from_db(entity: &'static str, err: DbErr) -> Self {
        let kind = err.sql_err();
        Self::classify(entity, err, kind)
    }

    // `sql_err()` only recognizes errors raised by a live driver, so the
    // mapping is kept apart from it.
    fn classify(entity: &'static str, err: DbErr, kind: Option<SqlErr>) -> Self {
        match kind {
            Some(SqlErr::UniqueConstraintViolation(_)) => DaoLayerError::DuplicateKey { entity },
            _ => DaoLayerError::Db(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DaoLayerError::NotFound { .. })
    }
}

impl fmt::Display for DaoLayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaoLayerError::Db(err) => write!(f, "Database error: {err}"),
            DaoLayerError::NotFound { entity, key } => {
                write!(f, "{entity} not found ({key})")
            }
            DaoLayerError::DuplicateKey { entity } => {
                write!(f, "{entity} violates a unique constraint")
            }
            DaoLayerError::Decode { entity, detail } => {
                write!(f, "Could not decode {entity} row: {detail}")
            }
        }
    }
}

impl std::error::Error for DaoLayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DaoLayerError::Db(err) => Some(err),
            _ => None,
        }
    }
}
