use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_host: String,
    pub app_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub environment: Environment,
    pub rust_log: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let (database_url, jwt_secret) = if cfg!(debug_assertions) {
            (
                defaults::DEV_DATABASE_URL.to_string(),
                defaults::DEV_JWT_SECRET.to_string(),
            )
        } else {
            (String::new(), String::new())
        };

        Self {
            app_host: defaults::DEFAULT_HOST.to_string(),
            app_port: defaults::DEFAULT_PORT,
            database_url,
            jwt_secret,
            environment: Environment::default(),
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
            db_max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            db_min_connections: defaults::DEFAULT_DB_MIN_CONNECTIONS,
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}
