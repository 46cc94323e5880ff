use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use ::config::ConfigError;
use ::config::{Config, Environment, File};

use crate::error::{ErrorCode, SocialGraphError};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub dot_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dot_path: PathBuf::from("socialnetwork.dot"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PremiumConfig {
    /// Point balance a new premium user starts with.
    pub starting_points: i64,
}

impl Default for PremiumConfig {
    fn default() -> Self {
        Self {
            starting_points: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    pub premium: PremiumConfig,
}

impl AppConfig {
    /// Load from `./config`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Layered load: `<dir>/default`, `<dir>/<RUN_MODE>`, then
    /// `SOCIALGRAPH__SECTION__KEY` environment variables.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        debug!("Loading config from {} (run mode {})", dir.display(), run_mode);

        let builder = Config::builder()
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join(&run_mode)).required(false))
            .add_source(Environment::with_prefix("SOCIALGRAPH").separator("__"));

        builder.build()?.try_deserialize()
    }
}

impl SocialGraphError for ConfigError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ConfigError::NotFound(_) => ErrorCode::NotFound,
            ConfigError::Foreign(_) => ErrorCode::Io,
            _ => ErrorCode::InvalidArgument,
        }
    }
}
