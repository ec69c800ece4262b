//! Service Configuration
//!
//! Layered as built-in defaults, then an optional TOML file, then
//! `ATTRITION__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use inference_engine::ArtifactPaths;
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Config file read when `ATTRITION_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "attrition.toml";

/// Service settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Listen address
    pub bind_addr: String,
    /// Trained model artifact
    pub model_path: PathBuf,
    /// Trained scaler artifact
    pub scaler_path: PathBuf,
    /// Maximum log level (trace, debug, info, warn, error)
    #[serde(deserialize_with = "deserialize_level")]
    pub log_level: Level,
    /// Emit JSON log lines instead of plain text
    pub log_json: bool,
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Level::from_str(&raw).map_err(|_| D::Error::custom(format!("invalid log_level {:?}", raw)))
}

impl Settings {
    /// Load settings from the file named by `ATTRITION_CONFIG` (or
    /// `attrition.toml`) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ATTRITION_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_file(Path::new(&path))
    }

    /// Load settings with `path` as the (optional) file layer
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let defaults = ArtifactPaths::default();

        Config::builder()
            .set_default("bind_addr", "0.0.0.0:8000")?
            .set_default("model_path", defaults.model.to_string_lossy().into_owned())?
            .set_default("scaler_path", defaults.scaler.to_string_lossy().into_owned())?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("ATTRITION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(self.model_path.clone(), self.scaler_path.clone())
    }
}
