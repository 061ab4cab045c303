use anyhow::{Result, bail};

use super::{AppConfig, defaults};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.app_host.trim().is_empty() {
        errors.push("APP_HOST must not be empty".to_string());
    }

    if cfg.database_url.trim().is_empty() {
        errors.push("DATABASE_URL must not be empty".to_string());
    }

    if cfg.jwt_secret.trim().is_empty() {
        errors.push("JWT_SECRET must not be empty".to_string());
    }

    if cfg.db_max_connections == 0 {
        errors.push("DB_MAX_CONNECTIONS must be > 0".to_string());
    }

    if cfg.db_min_connections > cfg.db_max_connections {
        errors.push(format!(
            "DB_MIN_CONNECTIONS ({}) must be <= DB_MAX_CONNECTIONS ({})",
            cfg.db_min_connections, cfg.db_max_connections
        ));
    }

    if cfg.request_timeout_secs == 0 {
        errors.push("REQUEST_TIMEOUT_SECS must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

/// Non-fatal findings, logged once tracing is up.
pub fn warnings(cfg: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if !cfg.jwt_secret.is_empty() && cfg.jwt_secret.len() < defaults::RECOMMENDED_JWT_SECRET_BYTES {
        warnings.push(format!(
            "JWT_SECRET is shorter than the recommended {} bytes",
            defaults::RECOMMENDED_JWT_SECRET_BYTES
        ));
    }
    warnings
}
