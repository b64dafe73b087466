//! Storage seam for plan and institution records.
//!
//! The engine only reads through this trait; snapshot refresh is the one
//! operation that writes a plan back.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::types::{Institution, WeeklyMenuPlan};
use crate::week::WeekKey;

/// Error types for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying I/O failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record key cannot be used by this backend
    #[error("Invalid record key: {0}")]
    InvalidKey(String),
}

/// Trait for reading and writing menu records.
///
/// Missing records are `Ok(None)`; errors are reserved for backend failures.
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Load one institution.
    async fn institution(&self, id: &str) -> Result<Option<Institution>, StoreError>;

    /// Load every institution, ordered by id.
    async fn institutions(&self) -> Result<Vec<Institution>, StoreError>;

    /// Create or replace an institution.
    async fn save_institution(&self, institution: &Institution) -> Result<(), StoreError>;

    /// Load the plan for a week.
    async fn plan(&self, key: WeekKey) -> Result<Option<WeeklyMenuPlan>, StoreError>;

    /// Create or replace a plan as a whole record.
    ///
    /// The stored record is never marked as a placeholder.
    async fn save_plan(&self, plan: &WeeklyMenuPlan) -> Result<(), StoreError>;
}

/// Copy of a plan ready to persist.
pub(crate) fn persisted(plan: &WeeklyMenuPlan) -> WeeklyMenuPlan {
    WeeklyMenuPlan {
        is_placeholder: false,
        ..plan.clone()
    }
}

/// Key of a plan, rejecting weeks that do not exist.
pub(crate) fn plan_key(plan: &WeeklyMenuPlan) -> Result<WeekKey, StoreError> {
    WeekKey::new(plan.year, plan.week)
        .ok_or_else(|| StoreError::InvalidKey(format!("{}-W{:02}", plan.year, plan.week)))
}
