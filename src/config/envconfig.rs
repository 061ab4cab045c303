use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Loads a config struct from the process environment.
///
/// Variable names map one-to-one onto lowercased field names
/// (`DATABASE_URL` -> `database_url`), so no prefix or separator is used.
/// Values are kept as strings and only converted when a field asks for a
/// number, so secrets such as `JWT_SECRET=007` survive unchanged.
pub trait EnvConfig: Sized + DeserializeOwned {
    fn load_dotenv() {
        // Load .env from crate root (falls back to current dir if missing)
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        Self::from_vars(None)
    }

    /// Reads `vars` instead of the process environment when given.
    fn from_vars(vars: Option<config_rs::Map<String, String>>) -> Result<Self> {
        let settings = config_rs::Config::builder()
            .add_source(config_rs::Environment::default().source(vars))
            .build()
            .context("failed to read environment variables for config")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
