//! Portal commands
//!
//! Every command prints a JSON document on success.

use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use menu_projection::{
    placeholder_plan, FileStore, MenuStore, ProjectionEngine, ProjectionError, RegistryCache,
    SnapshotService, WeekKey,
};
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum PortalCommands {
    /// Project a week's plan for one institution
    Project {
        /// Institution id
        institution: String,
        /// ISO week-numbering year
        year: i32,
        /// ISO week (1-53)
        week: u32,
    },

    /// Freeze current institution data into a week's plan
    RefreshSnapshot {
        year: i32,
        week: u32,
        /// Recorded as the snapshot author
        #[arg(short, long, default_value = "cli")]
        actor: String,
    },

    /// Print the placeholder plan for a week
    Placeholder { year: i32, week: u32 },

    /// Print the loaded registries
    Rules,

    /// List stored institutions
    Institutions,
}

/// Wired services for one portal run.
pub struct Portal {
    pub store: Arc<FileStore>,
    pub registries: Arc<RegistryCache>,
    pub engine: ProjectionEngine,
}

impl Portal {
    pub fn new(store: Arc<FileStore>, registries: Arc<RegistryCache>, engine: ProjectionEngine) -> Self {
        Self {
            store,
            registries,
            engine,
        }
    }
}

pub async fn execute_command(portal: &Portal, cmd: PortalCommands) -> anyhow::Result<String> {
    match cmd {
        PortalCommands::Project {
            institution,
            year,
            week,
        } => {
            let projected = portal.engine.project(&institution, year, week).await?;
            Ok(serde_json::to_string_pretty(&projected)?)
        }

        PortalCommands::RefreshSnapshot { year, week, actor } => {
            let service = SnapshotService::new(portal.store.clone());
            let refreshed = service.refresh(year, week, &actor).await?;
            info!(
                year,
                week,
                institutions = refreshed.snapshot.institutions.len(),
                "Snapshot written"
            );
            Ok(serde_json::to_string_pretty(&refreshed)?)
        }

        PortalCommands::Placeholder { year, week } => {
            let key = WeekKey::new(year, week).ok_or(ProjectionError::InvalidWeek { year, week })?;
            let registries = portal.registries.get().await?;
            let plan = placeholder_plan(key.year, key.week, &registries.categories);
            Ok(serde_json::to_string_pretty(&plan)?)
        }

        PortalCommands::Rules => {
            let registries = portal.registries.get().await?;
            Ok(serde_json::to_string_pretty(registries.as_ref())?)
        }

        PortalCommands::Institutions => {
            let institutions = portal
                .store
                .institutions()
                .await
                .with_context(|| format!("listing {}", portal.store.root().display()))?;
            Ok(serde_json::to_string_pretty(&institutions)?)
        }
    }
}
