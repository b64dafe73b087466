//! Configuration for the projection engine.

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryEntry, MAIN};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Label of the entry shown when no main dish is assigned
    pub placeholder_label: String,
    /// Catalog entry added for the unified "main" category
    pub main_category: CategoryEntry,
    /// Compute a SHA-256 fingerprint of every projection
    pub fingerprint: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_label: "No selection made yet".to_string(),
            main_category: CategoryEntry::new(MAIN, "Main course", "utensils"),
            fingerprint: true,
        }
    }
}

impl EngineConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
