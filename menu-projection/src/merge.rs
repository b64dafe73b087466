//! Folding the two parallel main-dish slots into one "main" category.
//!
//! Older plans store main dishes split across `mainA`/`mainB` with a
//! per-slot assignment set; newer plans may store them directly under
//! `main`. Non-internal institutions always see a single "main" entry.

use tracing::warn;

use crate::catalog::{MainSlot, MAIN};
use crate::types::{DayPlan, MenuItem};

/// How the "main" content for a day was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Plan already stored content under "main"
    PreUnified,
    /// Institution is assigned to this slot
    Assigned(MainSlot),
    /// Institution is assigned to neither slot
    NoSelection,
}

/// Result of merging one day's main slots for one institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedMain {
    pub items: Vec<MenuItem>,
    pub outcome: MergeOutcome,
}

/// The main slot an institution holds on a day, if any.
///
/// An institution should appear in at most one slot; if it appears in
/// both, the first slot in [`MainSlot::ORDER`] wins.
pub fn assigned_main_slot(day: &DayPlan, institution_id: &str) -> Option<MainSlot> {
    MainSlot::ORDER
        .into_iter()
        .find(|slot| day.is_assigned(slot.key(), institution_id))
}

/// Merges main slots for non-internal institutions.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentMerger<'a> {
    placeholder_label: &'a str,
}

impl<'a> AssignmentMerger<'a> {
    pub fn new(placeholder_label: &'a str) -> Self {
        Self { placeholder_label }
    }

    /// Decide the "main" content of a day for an institution.
    pub fn merge(&self, day: &DayPlan, institution_id: &str) -> MergedMain {
        let unified = day.items(MAIN);
        if !unified.is_empty() {
            return MergedMain {
                items: unified.to_vec(),
                outcome: MergeOutcome::PreUnified,
            };
        }

        if MainSlot::ORDER
            .iter()
            .all(|slot| day.is_assigned(slot.key(), institution_id))
        {
            warn!(
                institution_id = %institution_id,
                "Institution assigned to both main slots, first slot wins"
            );
        }

        match assigned_main_slot(day, institution_id) {
            Some(slot) => MergedMain {
                items: day.items(slot.key()).to_vec(),
                outcome: MergeOutcome::Assigned(slot),
            },
            None => MergedMain {
                items: vec![MenuItem::no_selection(self.placeholder_label)],
                outcome: MergeOutcome::NoSelection,
            },
        }
    }
}
