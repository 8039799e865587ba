//! Top-level configuration: engine tuning, mitigation provider, climate feed
//! and storage location. Loaded from JSON, then overridden by environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::climate::ClimateConfig;
use crate::engine::EngineSettings;
use crate::mitigation::MitigationConfig;

pub const DEFAULT_DB_FILE: &str = "chainrisk.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub mitigation: MitigationConfig,
    #[serde(default)]
    pub climate: ClimateConfig,
    /// Directory for the saved-runs database. Defaults to the working
    /// directory.
    #[serde(default)]
    pub data_dir: Option<String>,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Reads `path` when given, applies env overrides and validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.mitigation.apply_overrides_from(&lookup);

        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = get("CHAINRISK_CLIMATE_URL") {
            self.climate.feed_url = Some(url.trim().to_string());
        }
        if let Some(dir) = get("CHAINRISK_DATA_DIR") {
            self.data_dir = Some(dir.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        self.mitigation
            .validate_selected_provider()
            .map_err(|error| ConfigError::Invalid(error.to_string()))?;
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        match self.data_dir.as_deref() {
            Some(dir) => Path::new(dir).join(DEFAULT_DB_FILE),
            None => PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}
