//! The projection engine: one canonical plan to one institution's view.
//!
//! The engine holds no mutable state of its own besides the injected
//! registry cache. Each projection is a function of the institution record,
//! the plan record (or placeholder) and the registries, so projections for
//! any institutions may run concurrently.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::catalog::CategoryCatalog;
use crate::config::EngineConfig;
use crate::error::ProjectionError;
use crate::merge::AssignmentMerger;
use crate::placeholder::placeholder_plan;
use crate::projector::{CategoryProjector, ProjectedDay};
use crate::registry::{Registries, RegistryCache};
use crate::resolver::RuleResolver;
use crate::snapshot::{FlagSource, SnapshotResolver};
use crate::store::MenuStore;
use crate::types::{Institution, InstitutionType, WeeklyMenuPlan, Weekday};
use crate::week::WeekKey;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// The view of a weekly plan one institution is entitled to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPlan {
    pub year: i32,
    pub week: u32,
    pub institution_id: String,
    pub institution_type: InstitutionType,
    pub days: BTreeMap<Weekday, ProjectedDay>,
    /// Raw catalog plus the synthetic "main" entry
    pub category_catalog: CategoryCatalog,
    /// No plan was published for the week
    pub is_placeholder: bool,
    /// Diet flags came from the plan's snapshot
    pub used_snapshot: bool,
    /// SHA-256 over the projected content, when enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Projects weekly plans for institutions.
pub struct ProjectionEngine {
    /// Plan and institution records
    store: Arc<dyn MenuStore>,
    /// Static registries, read through
    registries: Arc<RegistryCache>,
    /// Configuration
    config: EngineConfig,
}

impl ProjectionEngine {
    pub fn new(store: Arc<dyn MenuStore>, registries: Arc<RegistryCache>) -> Self {
        Self {
            store,
            registries,
            config: EngineConfig::default(),
        }
    }

    /// Create with configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Project the plan of (year, week) for an institution.
    ///
    /// A week without a stored plan projects a placeholder instead of
    /// failing. Unknown institutions are `NotFound`; a missing visibility
    /// rule is a `Configuration` error.
    pub async fn project(
        &self,
        institution_id: &str,
        year: i32,
        week: u32,
    ) -> Result<ProjectedPlan, ProjectionError> {
        let result = self.load_and_project(institution_id, year, week).await;

        match &result {
            Ok(projected) => debug!(
                institution_id = %institution_id,
                year,
                week,
                institution_type = %projected.institution_type,
                is_placeholder = projected.is_placeholder,
                used_snapshot = projected.used_snapshot,
                "Projected weekly plan"
            ),
            Err(e) if e.is_configuration() => error!(
                institution_id = %institution_id,
                year,
                week,
                error = %e,
                "Projection failed on configuration defect"
            ),
            Err(e) if e.is_not_found() => debug!(
                institution_id = %institution_id,
                error = %e,
                "Projection target not found"
            ),
            Err(e) => warn!(
                institution_id = %institution_id,
                year,
                week,
                error = %e,
                "Projection failed"
            ),
        }

        result
    }

    async fn load_and_project(
        &self,
        institution_id: &str,
        year: i32,
        week: u32,
    ) -> Result<ProjectedPlan, ProjectionError> {
        let key = WeekKey::new(year, week).ok_or(ProjectionError::InvalidWeek { year, week })?;

        let institution = self
            .store
            .institution(institution_id)
            .await?
            .ok_or_else(|| ProjectionError::institution_not_found(institution_id))?;

        let registries = self.registries.get().await?;

        // Only a synthesized plan is a placeholder, whatever a stored record claims
        let (plan, is_placeholder) = match self.store.plan(key).await? {
            Some(plan) => (plan, false),
            None => {
                info!(week = %key, "No plan stored, projecting placeholder");
                (
                    placeholder_plan(key.year, key.week, &registries.categories),
                    true,
                )
            }
        };

        self.assemble(key, &registries, &institution, &plan, is_placeholder)
    }

    /// Project an already loaded plan.
    ///
    /// Pure with respect to its inputs: no store access, no mutation of
    /// `plan`. The plan's (year, week) must be a valid ISO week.
    pub fn project_plan(
        &self,
        registries: &Registries,
        institution: &Institution,
        plan: &WeeklyMenuPlan,
    ) -> Result<ProjectedPlan, ProjectionError> {
        let key = WeekKey::new(plan.year, plan.week).ok_or(ProjectionError::InvalidWeek {
            year: plan.year,
            week: plan.week,
        })?;
        self.assemble(key, registries, institution, plan, plan.is_placeholder)
    }

    fn assemble(
        &self,
        key: WeekKey,
        registries: &Registries,
        institution: &Institution,
        plan: &WeeklyMenuPlan,
        is_placeholder: bool,
    ) -> Result<ProjectedPlan, ProjectionError> {
        let snapshot = SnapshotResolver::new(plan, institution);
        let resolved =
            RuleResolver::from_registries(registries).resolve_as(institution, snapshot.is_intern())?;
        let projector = CategoryProjector::new(
            institution,
            resolved,
            AssignmentMerger::new(&self.config.placeholder_label),
        );

        let days: BTreeMap<Weekday, ProjectedDay> = Weekday::ALL
            .iter()
            .map(|weekday| {
                let day = projector.project_day(
                    plan.day(*weekday),
                    key.date_of(*weekday),
                    snapshot.flags(*weekday),
                );
                (*weekday, day)
            })
            .collect();

        let fingerprint = self
            .config
            .fingerprint
            .then(|| fingerprint(&institution.id, resolved.institution_type, &days));

        Ok(ProjectedPlan {
            year: key.year,
            week: key.week,
            institution_id: institution.id.clone(),
            institution_type: resolved.institution_type,
            days,
            category_catalog: registries
                .categories
                .augmented(&self.config.main_category),
            is_placeholder,
            used_snapshot: snapshot.source() == FlagSource::Snapshot,
            fingerprint,
        })
    }
}

/// Hash of the projected content, stable for identical inputs.
fn fingerprint(
    institution_id: &str,
    institution_type: InstitutionType,
    days: &BTreeMap<Weekday, ProjectedDay>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(institution_id.as_bytes());
    hasher.update(institution_type.as_str().as_bytes());
    hasher.update(serde_json::to_vec(days).unwrap_or_default());
    hex::encode(hasher.finalize())
}
