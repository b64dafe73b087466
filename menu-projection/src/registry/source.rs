//! Where registries come from.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{Registries, RegistryError};

/// Trait for loading the static registries.
///
/// Loading must be idempotent: the cache may call it more than once when
/// first requests race.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Load the full registry set.
    async fn load(&self) -> Result<Registries, RegistryError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// Fixed in-process registries.
pub struct StaticRegistrySource {
    registries: Registries,
}

impl StaticRegistrySource {
    pub fn new(registries: Registries) -> Self {
        Self { registries }
    }

    /// Source serving [`Registries::builtin`].
    pub fn builtin() -> Self {
        Self::new(Registries::builtin())
    }
}

#[async_trait]
impl RegistrySource for StaticRegistrySource {
    async fn load(&self) -> Result<Registries, RegistryError> {
        Ok(self.registries.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Registries read from a YAML document on disk.
pub struct YamlRegistrySource {
    path: PathBuf,
}

impl YamlRegistrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RegistrySource for YamlRegistrySource {
    async fn load(&self) -> Result<Registries, RegistryError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RegistryError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Registries::from_yaml(&raw)
    }

    fn describe(&self) -> String {
        format!("yaml:{}", self.path.display())
    }
}
