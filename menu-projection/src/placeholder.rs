//! Empty plans for weeks that have not been published yet.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{CategoryCatalog, MAIN_SLOTS};
use crate::types::{DayPlan, WeeklyMenuPlan, Weekday};

/// Synthesize an empty, canonically shaped plan.
///
/// Every weekday carries every catalog category with no content and empty
/// assignment sets for both main slots. The result has no snapshot and is
/// marked as a placeholder.
pub fn placeholder_plan(year: i32, week: u32, catalog: &CategoryCatalog) -> WeeklyMenuPlan {
    let day = DayPlan {
        content: catalog
            .keys()
            .map(|key| (key.to_string(), Vec::new()))
            .collect(),
        assignments: MAIN_SLOTS
            .iter()
            .map(|slot| (slot.to_string(), BTreeSet::new()))
            .collect(),
    };

    WeeklyMenuPlan {
        year,
        week,
        days: Weekday::ALL
            .iter()
            .map(|weekday| (*weekday, day.clone()))
            .collect::<BTreeMap<_, _>>(),
        institution_snapshot: None,
        is_placeholder: true,
    }
}
