//! Portal configuration

use menu_projection::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortalConfig {
    /// Directory holding institution and plan records
    pub data_dir: PathBuf,

    /// Registry file; the built-in registries are used when unset
    pub registry_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is not set
    pub log_level: String,

    /// Emit logs as JSON lines
    pub json_logs: bool,

    /// Projection engine settings
    pub engine: EngineConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            registry_file: None,
            log_level: "info".to_string(),
            json_logs: false,
            engine: EngineConfig::default(),
        }
    }
}

impl PortalConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a file, falling back to defaults when it does not exist.
    ///
    /// Returns whether the file was found alongside the config.
    pub fn load_or_default(path: &Path) -> Result<(Self, bool), ConfigError> {
        if !path.exists() {
            return Ok((Self::default(), false));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((Self::from_yaml(&content)?, true))
    }
}
