//! Institution-scoped menu projection.
//!
//! A weekly menu plan is authored once and shared by every affiliated
//! institution. This crate turns that canonical plan into the view a single
//! institution is entitled to see:
//!
//! - **Rule resolution**: institution record to institution type and visibility rule
//! - **Snapshot resolution**: published weeks use the diet flags frozen into the plan
//! - **Assignment merging**: the parallel main slots fold into one "main" category
//! - **Category projection**: per-day filtering by rule and diet flags
//! - **Placeholders**: unpublished weeks project an empty, canonically shaped plan
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ProjectionEngine                      │
//! │                                                          │
//! │  ┌──────────────┐  ┌────────────────┐  ┌──────────────┐  │
//! │  │ RuleResolver │  │SnapshotResolver│  │ Placeholder  │  │
//! │  └──────┬───────┘  └───────┬────────┘  └──────────────┘  │
//! │         └────────┬─────────┘                             │
//! │          ┌───────▼──────────┐   ┌───────────────────┐    │
//! │          │CategoryProjector │──▶│ AssignmentMerger  │    │
//! │          └──────────────────┘   └───────────────────┘    │
//! └──────────┬──────────────────────────────┬────────────────┘
//!            │                              │
//!     ┌──────▼──────┐               ┌───────▼───────┐
//!     │  MenuStore  │               │ RegistryCache │
//!     └─────────────┘               └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use menu_projection::{InMemoryStore, ProjectionEngine, RegistryCache, StaticRegistrySource};
//!
//! let registries = Arc::new(RegistryCache::new(Arc::new(StaticRegistrySource::builtin())));
//! let engine = ProjectionEngine::new(Arc::new(store), registries);
//!
//! let projected = engine.project("inst-1", 2024, 10).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod placeholder;
pub mod projector;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod week;

// Re-export main types
pub use catalog::{CategoryCatalog, CategoryEntry, MainSlot};
pub use config::EngineConfig;
pub use engine::{ProjectedPlan, ProjectionEngine};
pub use error::ProjectionError;
pub use merge::{assigned_main_slot, AssignmentMerger, MergeOutcome, MergedMain};
pub use placeholder::placeholder_plan;
pub use projector::{CategoryProjector, ProjectedDay};
pub use registry::{
    PopulationGroupMapping, Registries, RegistryCache, RegistryError, RegistrySource,
    StaticRegistrySource, VisibilityRule, VisibilityRuleSet, YamlRegistrySource,
};
pub use resolver::{ResolvedRule, RuleResolver};
pub use snapshot::{FlagSource, SnapshotRefresh, SnapshotResolver, SnapshotService};
pub use store::{FileStore, InMemoryStore, MenuStore, StoreError};
pub use types::*;
pub use week::WeekKey;
