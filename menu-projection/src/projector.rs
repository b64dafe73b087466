//! Per-day category filtering for one institution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{is_main_slot, MainSlot, DESSERT, MAIN, SOUP};
use crate::merge::{assigned_main_slot, AssignmentMerger};
use crate::resolver::ResolvedRule;
use crate::types::{DayPlan, DietFlags, Institution, MenuItem};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// One day of a projected plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProjectedDay {
    pub date: NaiveDate,
    /// Visible categories and their content
    pub content: BTreeMap<String, Vec<MenuItem>>,
    /// Raw assignments of the day, unfiltered
    pub assignments: BTreeMap<String, BTreeSet<String>>,
    /// Main slot the institution holds, for the order module
    pub assigned_slot: Option<MainSlot>,
}

/// Builds filtered day content for one institution under its rule.
pub struct CategoryProjector<'a> {
    institution: &'a Institution,
    resolved: ResolvedRule<'a>,
    merger: AssignmentMerger<'a>,
}

impl<'a> CategoryProjector<'a> {
    pub fn new(
        institution: &'a Institution,
        resolved: ResolvedRule<'a>,
        merger: AssignmentMerger<'a>,
    ) -> Self {
        Self {
            institution,
            resolved,
            merger,
        }
    }

    /// Project one day with the diet flags already resolved for it.
    ///
    /// Never mutates `day`; every returned structure is freshly built.
    pub fn project_day(&self, day: &DayPlan, date: NaiveDate, flags: DietFlags) -> ProjectedDay {
        let rule = self.resolved.rule;
        let merges = self.resolved.institution_type.merges_main_slots();

        let mut content = BTreeMap::new();
        let mut main_emitted = false;

        for category in &rule.visible_categories {
            let category = category.as_str();

            if merges && (is_main_slot(category) || category == MAIN) {
                // Both slots fold into one entry; later slots are skipped.
                if !main_emitted {
                    let merged = self.merger.merge(day, &self.institution.id);
                    content.insert(MAIN.to_string(), merged.items);
                    main_emitted = true;
                }
                continue;
            }

            if merges && rule.diet_plan_based && !diet_flag_allows(category, flags) {
                continue;
            }

            content.insert(category.to_string(), day.items(category).to_vec());
        }

        ProjectedDay {
            date,
            content,
            assignments: day.assignments.clone(),
            assigned_slot: assigned_main_slot(day, &self.institution.id),
        }
    }
}

/// Whether a day's diet flags permit a non-main category.
///
/// Only soup and dessert have flags; other categories are not gated.
fn diet_flag_allows(category: &str, flags: DietFlags) -> bool {
    match category {
        SOUP => flags.soup,
        DESSERT => flags.dessert,
        _ => true,
    }
}
