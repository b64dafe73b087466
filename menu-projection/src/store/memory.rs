//! In-memory store.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{persisted, plan_key, MenuStore, StoreError};
use crate::types::{Institution, WeeklyMenuPlan};
use crate::week::WeekKey;

/// Store keeping every record in process memory.
///
/// Used by tests and by embedders that load records elsewhere.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    /// Institutions by id
    institutions: Arc<RwLock<BTreeMap<String, Institution>>>,
    /// Plans by week
    plans: Arc<RwLock<HashMap<WeekKey, WeeklyMenuPlan>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with records.
    pub async fn with_records(
        institutions: impl IntoIterator<Item = Institution>,
        plans: impl IntoIterator<Item = WeeklyMenuPlan>,
    ) -> Self {
        let store = Self::new();
        {
            let mut map = store.institutions.write().await;
            for institution in institutions {
                map.insert(institution.id.clone(), institution);
            }
        }
        {
            let mut map = store.plans.write().await;
            for plan in plans {
                map.insert(
                    WeekKey {
                        year: plan.year,
                        week: plan.week,
                    },
                    persisted(&plan),
                );
            }
        }
        store
    }
}

#[async_trait]
impl MenuStore for InMemoryStore {
    async fn institution(&self, id: &str) -> Result<Option<Institution>, StoreError> {
        Ok(self.institutions.read().await.get(id).cloned())
    }

    async fn institutions(&self) -> Result<Vec<Institution>, StoreError> {
        Ok(self.institutions.read().await.values().cloned().collect())
    }

    async fn save_institution(&self, institution: &Institution) -> Result<(), StoreError> {
        self.institutions
            .write()
            .await
            .insert(institution.id.clone(), institution.clone());
        Ok(())
    }

    async fn plan(&self, key: WeekKey) -> Result<Option<WeeklyMenuPlan>, StoreError> {
        Ok(self.plans.read().await.get(&key).cloned())
    }

    async fn save_plan(&self, plan: &WeeklyMenuPlan) -> Result<(), StoreError> {
        let key = plan_key(plan)?;
        self.plans.write().await.insert(key, persisted(plan));
        Ok(())
    }
}
