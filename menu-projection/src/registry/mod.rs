//! Static registries consumed by the engine.
//!
//! - **Category catalog**: category keys with display metadata
//! - **Population-group mapping**: free-form labels to institution types
//! - **Visibility rule set**: institution types to visible categories
//!
//! Registries are configuration, never written during projection. They are
//! produced by a [`RegistrySource`] and held in a [`RegistryCache`] that the
//! engine reads through.

pub mod builtin;
pub mod cache;
pub mod source;

pub use cache::RegistryCache;
pub use source::{RegistrySource, StaticRegistrySource, YamlRegistrySource};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::CategoryCatalog;
use crate::types::InstitutionType;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Error types for registry loading.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Registry file could not be read
    #[error("Failed to read registry file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Registry document is malformed
    #[error("Failed to parse registry document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Maps population-group labels to institution types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationGroupMapping(BTreeMap<String, InstitutionType>);

impl PopulationGroupMapping {
    pub fn new(entries: impl IntoIterator<Item = (String, InstitutionType)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Look up a label, ignoring surrounding whitespace and ASCII case.
    pub fn lookup(&self, label: &str) -> Option<InstitutionType> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        self.0
            .iter()
            .find(|(known, _)| known.trim().eq_ignore_ascii_case(label))
            .map(|(_, institution_type)| *institution_type)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which categories an institution type may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    /// Category keys in display order
    pub visible_categories: Vec<String>,
    /// Whether soup/dessert visibility is gated by per-day diet flags
    #[serde(default)]
    pub diet_plan_based: bool,
}

impl VisibilityRule {
    pub fn new<I, S>(visible_categories: I, diet_plan_based: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visible_categories: visible_categories.into_iter().map(Into::into).collect(),
            diet_plan_based,
        }
    }

    /// Whether the rule lists either parallel main slot.
    pub fn includes_main_slots(&self) -> bool {
        self.visible_categories
            .iter()
            .any(|c| crate::catalog::is_main_slot(c))
    }
}

/// Visibility rules keyed by institution type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityRuleSet(BTreeMap<InstitutionType, VisibilityRule>);

impl VisibilityRuleSet {
    pub fn new(rules: impl IntoIterator<Item = (InstitutionType, VisibilityRule)>) -> Self {
        Self(rules.into_iter().collect())
    }

    pub fn get(&self, institution_type: InstitutionType) -> Option<&VisibilityRule> {
        self.0.get(&institution_type)
    }

    /// Institution types that have no rule.
    pub fn missing_types(&self) -> Vec<InstitutionType> {
        InstitutionType::ALL
            .iter()
            .filter(|t| !self.0.contains_key(t))
            .copied()
            .collect()
    }
}

/// The full set of static registries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registries {
    #[serde(default)]
    pub categories: CategoryCatalog,
    #[serde(default)]
    pub population_groups: PopulationGroupMapping,
    #[serde(default)]
    pub rules: VisibilityRuleSet,
}

impl Registries {
    /// Parse a registry document.
    pub fn from_yaml(yaml: &str) -> Result<Self, RegistryError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize to a registry document.
    pub fn to_yaml(&self) -> Result<String, RegistryError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
