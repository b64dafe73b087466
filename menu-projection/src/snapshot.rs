//! Snapshot resolution and refresh.
//!
//! A published plan can carry an [`InstitutionSnapshot`]. While it does,
//! diet flags and the internal flag of every snapshotted institution come
//! from the snapshot, which keeps projections of historical weeks stable
//! when institutions are later reconfigured.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ProjectionError;
use crate::store::MenuStore;
use crate::types::{DietFlags, Institution, InstitutionSnapshot, SnapshotEntry, WeeklyMenuPlan, Weekday};
use crate::week::WeekKey;

/// Where a day's diet flags came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSource {
    /// The plan's embedded snapshot
    Snapshot,
    /// The institution record as it is now
    Live,
}

/// Chooses between snapshotted and live diet flags for one institution.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotResolver<'a> {
    entry: Option<&'a SnapshotEntry>,
    live: &'a Institution,
}

impl<'a> SnapshotResolver<'a> {
    pub fn new(plan: &'a WeeklyMenuPlan, institution: &'a Institution) -> Self {
        let entry = plan
            .institution_snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.entry(&institution.id));
        Self {
            entry,
            live: institution,
        }
    }

    pub fn source(&self) -> FlagSource {
        if self.entry.is_some() {
            FlagSource::Snapshot
        } else {
            FlagSource::Live
        }
    }

    /// Internal flag as of the snapshot, else as of now.
    pub fn is_intern(&self) -> bool {
        match self.entry {
            Some(entry) => entry.is_intern,
            None => self.live.is_intern,
        }
    }

    /// Diet flags for a weekday.
    pub fn flags(&self, day: Weekday) -> DietFlags {
        match self.entry {
            Some(entry) => entry.diet_plan.flags(day),
            None => self.live.diet_plan.flags(day),
        }
    }
}

/// Outcome of a snapshot refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRefresh {
    pub year: i32,
    pub week: u32,
    pub snapshot: InstitutionSnapshot,
}

/// Overwrites a plan's embedded institution snapshot.
///
/// The refresh is a whole-record read-modify-write. Two concurrent
/// refreshes of the same week are not serialized; the last write wins.
pub struct SnapshotService {
    store: Arc<dyn MenuStore>,
}

impl SnapshotService {
    pub fn new(store: Arc<dyn MenuStore>) -> Self {
        Self { store }
    }

    /// Refresh the snapshot of a week, stamped with the current time.
    pub async fn refresh(
        &self,
        year: i32,
        week: u32,
        actor: &str,
    ) -> Result<SnapshotRefresh, ProjectionError> {
        self.refresh_at(year, week, actor, Utc::now()).await
    }

    /// Refresh the snapshot of a week with an explicit timestamp.
    pub async fn refresh_at(
        &self,
        year: i32,
        week: u32,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<SnapshotRefresh, ProjectionError> {
        let key = WeekKey::new(year, week).ok_or(ProjectionError::InvalidWeek { year, week })?;

        let mut plan = match self.store.plan(key).await? {
            Some(plan) => plan,
            None => {
                debug!(week = %key, "Snapshot refresh for missing plan");
                return Err(ProjectionError::plan_not_found(key));
            }
        };

        let institutions = self.store.institutions().await?;
        let actor = Some(actor.to_string()).filter(|a| !a.is_empty());
        let snapshot = InstitutionSnapshot::capture(&institutions, now, actor);

        let replaced = plan.institution_snapshot.is_some();
        plan.institution_snapshot = Some(snapshot.clone());
        self.store.save_plan(&plan).await?;

        info!(
            week = %key,
            institutions = snapshot.institutions.len(),
            replaced,
            generated_by = snapshot.generated_by.as_deref().unwrap_or("-"),
            "Institution snapshot refreshed"
        );

        Ok(SnapshotRefresh {
            year: key.year,
            week: key.week,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::DietPlan;

    fn kita(soup: bool) -> Institution {
        Institution::new("kita-1", "Kita").with_diet_plan(DietPlan::uniform(DietFlags {
            soup,
            main: true,
            dessert: false,
        }))
    }

    #[test]
    fn test_live_flags_without_snapshot() {
        let plan = WeeklyMenuPlan::new(2024, 10);
        let institution = kita(true);
        let resolver = SnapshotResolver::new(&plan, &institution);
        assert_eq!(resolver.source(), FlagSource::Live);
        assert!(resolver.flags(Weekday::Monday).soup);
    }

    #[test]
    fn test_snapshot_flags_take_precedence() {
        let mut plan = WeeklyMenuPlan::new(2024, 10);
        plan.institution_snapshot = Some(InstitutionSnapshot::capture(
            [&kita(false)],
            Utc::now(),
            None,
        ));

        let live = kita(true);
        let resolver = SnapshotResolver::new(&plan, &live);
        assert_eq!(resolver.source(), FlagSource::Snapshot);
        assert!(!resolver.flags(Weekday::Monday).soup);
    }

    #[test]
    fn test_snapshot_internal_flag_takes_precedence() {
        let mut plan = WeeklyMenuPlan::new(2024, 10);
        plan.institution_snapshot = Some(InstitutionSnapshot::capture(
            [&kita(true)],
            Utc::now(),
            None,
        ));

        let live = kita(true).internal();
        assert!(!SnapshotResolver::new(&plan, &live).is_intern());

        plan.institution_snapshot = None;
        assert!(SnapshotResolver::new(&plan, &live).is_intern());
    }

    #[test]
    fn test_institution_absent_from_snapshot_uses_live() {
        let mut plan = WeeklyMenuPlan::new(2024, 10);
        plan.institution_snapshot = Some(InstitutionSnapshot::capture(
            [&Institution::new("other", "Other")],
            Utc::now(),
            None,
        ));

        let live = kita(true);
        let resolver = SnapshotResolver::new(&plan, &live);
        assert_eq!(resolver.source(), FlagSource::Live);
        assert!(resolver.flags(Weekday::Friday).soup);
    }

    #[tokio::test]
    async fn test_refresh_overwrites_snapshot() {
        let store = Arc::new(
            InMemoryStore::with_records([kita(true)], [WeeklyMenuPlan::new(2024, 10)]).await,
        );
        let service = SnapshotService::new(store.clone());

        let first = service.refresh(2024, 10, "admin").await.unwrap();
        assert_eq!(first.week, 10);
        assert_eq!(first.snapshot.generated_by.as_deref(), Some("admin"));

        store.save_institution(&kita(false)).await.unwrap();
        service.refresh(2024, 10, "admin").await.unwrap();

        let plan = store
            .plan(WeekKey::new(2024, 10).unwrap())
            .await
            .unwrap()
            .unwrap();
        let entry = plan
            .institution_snapshot
            .as_ref()
            .and_then(|s| s.entry("kita-1"))
            .unwrap();
        assert!(!entry.diet_plan.flags(Weekday::Monday).soup);
    }

    #[tokio::test]
    async fn test_refresh_missing_plan_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let service = SnapshotService::new(store);
        let err = service.refresh(2024, 11, "admin").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_refresh_rejects_invalid_week() {
        let service = SnapshotService::new(Arc::new(InMemoryStore::new()));
        let err = service.refresh(2024, 99, "admin").await.unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidWeek { .. }));
    }
}
