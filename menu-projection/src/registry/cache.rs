//! Read-through cache for the static registries.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{Registries, RegistryError, RegistrySource};

/// Read-through registry cache, populated once on first use.
///
/// Concurrent first callers may each load from the source. The first
/// loaded value stored wins and every later caller sees that same value,
/// so a race only costs duplicated I/O. No lock is held across the load.
pub struct RegistryCache {
    /// Where registries are loaded from
    source: Arc<dyn RegistrySource>,
    /// Populated registries
    cached: RwLock<Option<Arc<Registries>>>,
    /// Number of completed source loads
    loads: AtomicU32,
}

impl RegistryCache {
    pub fn new(source: Arc<dyn RegistrySource>) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
            loads: AtomicU32::new(0),
        }
    }

    /// Cache pre-populated with fixed registries.
    pub fn preloaded(registries: Registries) -> Self {
        let source = Arc::new(super::StaticRegistrySource::new(registries.clone()));
        Self {
            source,
            cached: RwLock::new(Some(Arc::new(registries))),
            loads: AtomicU32::new(0),
        }
    }

    /// Get the registries, loading them on first use.
    pub async fn get(&self) -> Result<Arc<Registries>, RegistryError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(Arc::clone(cached));
        }

        debug!(source = %self.source.describe(), "Registry cache miss, loading");
        let loaded = Arc::new(self.source.load().await?);
        self.loads.fetch_add(1, Ordering::SeqCst);

        let mut slot = self.cached.write().await;
        let registries = slot.get_or_insert_with(|| {
            info!(
                source = %self.source.describe(),
                categories = loaded.categories.entries().len(),
                population_groups = loaded.population_groups.len(),
                "Registries loaded"
            );
            Arc::clone(&loaded)
        });
        Ok(Arc::clone(registries))
    }

    /// Drop the cached registries so the next call reloads.
    pub async fn invalidate(&self) {
        let mut slot = self.cached.write().await;
        *slot = None;
        debug!(source = %self.source.describe(), "Registry cache invalidated");
    }

    /// Whether registries are currently cached.
    pub async fn is_populated(&self) -> bool {
        self.cached.read().await.is_some()
    }

    /// Number of completed loads from the source.
    pub fn load_count(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }
}
