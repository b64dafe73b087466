//! Core records for the projection engine.
//!
//! These types mirror the week-plan and institution records persisted by the
//! portal. Field names serialize in camelCase to stay compatible with the
//! records the admin screens write.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for the rendering layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Day of the week a plan is authored for.
///
/// Ordering follows the calendar week (Monday first), so maps keyed by
/// `Weekday` iterate in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven weekdays, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Record key used in persisted plans.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Convert to the chrono weekday for calendar arithmetic.
    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Self::Monday => chrono::Weekday::Mon,
            Self::Tuesday => chrono::Weekday::Tue,
            Self::Wednesday => chrono::Weekday::Wed,
            Self::Thursday => chrono::Weekday::Thu,
            Self::Friday => chrono::Weekday::Fri,
            Self::Saturday => chrono::Weekday::Sat,
            Self::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-day participation flags of an institution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(default)]
pub struct DietFlags {
    pub soup: bool,
    pub main: bool,
    pub dessert: bool,
}

impl DietFlags {
    /// Flags with every course enabled.
    pub fn all() -> Self {
        Self {
            soup: true,
            main: true,
            dessert: true,
        }
    }
}

/// Weekly diet plan of an institution.
///
/// A weekday missing from the record means the institution takes no
/// course that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct DietPlan(BTreeMap<Weekday, DietFlags>);

impl DietPlan {
    /// A plan that enables the same flags on every weekday.
    pub fn uniform(flags: DietFlags) -> Self {
        Self(Weekday::ALL.iter().map(|day| (*day, flags)).collect())
    }

    /// Flags for a weekday (all disabled if the day is not recorded).
    pub fn flags(&self, day: Weekday) -> DietFlags {
        self.0.get(&day).copied().unwrap_or_default()
    }

    /// Builder: replace the flags of one weekday.
    pub fn with_day(mut self, day: Weekday, flags: DietFlags) -> Self {
        self.0.insert(day, flags);
        self
    }

    /// Replace the flags of one weekday in place.
    pub fn set(&mut self, day: Weekday, flags: DietFlags) {
        self.0.insert(day, flags);
    }
}

/// A customer site receiving a filtered view of the weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_code: String,
    #[serde(default)]
    pub is_intern: bool,
    /// Free-form population group label, mapped to an [`InstitutionType`]
    #[serde(default)]
    pub population_group: String,
    #[serde(default)]
    pub diet_plan: DietPlan,
}

impl Institution {
    /// Create an external institution with no population group and an empty diet plan.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_code: String::new(),
            is_intern: false,
            population_group: String::new(),
            diet_plan: DietPlan::default(),
        }
    }

    /// Builder: mark as internal kitchen.
    pub fn internal(mut self) -> Self {
        self.is_intern = true;
        self
    }

    /// Builder: set the population group label.
    pub fn with_population_group(mut self, group: impl Into<String>) -> Self {
        self.population_group = group.into();
        self
    }

    /// Builder: set the diet plan.
    pub fn with_diet_plan(mut self, diet_plan: DietPlan) -> Self {
        self.diet_plan = diet_plan;
        self
    }

    /// Builder: set the short code.
    pub fn with_short_code(mut self, short_code: impl Into<String>) -> Self {
        self.short_code = short_code.into();
        self
    }
}

/// Closed set of institution types a visibility rule can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum InstitutionType {
    /// Internal kitchen, sees every slot unmerged
    Internal,
    /// External contract customer (the default for unknown groups)
    External,
    Kindergarten,
    School,
}

impl InstitutionType {
    pub const ALL: [InstitutionType; 4] = [
        InstitutionType::Internal,
        InstitutionType::External,
        InstitutionType::Kindergarten,
        InstitutionType::School,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Kindergarten => "kindergarten",
            Self::School => "school",
        }
    }

    /// Whether the two parallel main slots are folded into one "main" category.
    pub fn merges_main_slots(&self) -> bool {
        match self {
            Self::Internal => false,
            Self::External | Self::Kindergarten | Self::School => true,
        }
    }
}

impl std::fmt::Display for InstitutionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a recipe in the recipe store, passed through unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct RecipeRef(pub String);

impl From<&str> for RecipeRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Synthetic entry shown when an institution has not been given a main dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PlaceholderItem {
    pub placeholder: bool,
    pub label: String,
}

/// One entry in a category's content list.
///
/// Recipe references are usually id strings. Entries of any other shape
/// are carried through as-is; the engine never inspects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(untagged)]
pub enum MenuItem {
    Recipe(RecipeRef),
    Placeholder(PlaceholderItem),
    Opaque(#[cfg_attr(feature = "typescript", ts(type = "unknown"))] serde_json::Value),
}

impl MenuItem {
    /// Recipe entry from a reference string.
    pub fn recipe(id: impl Into<String>) -> Self {
        Self::Recipe(RecipeRef(id.into()))
    }

    /// The "no selection made yet" entry.
    pub fn no_selection(label: impl Into<String>) -> Self {
        Self::Placeholder(PlaceholderItem {
            placeholder: true,
            label: label.into(),
        })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Raw content and assignments for one weekday of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct DayPlan {
    /// Category key to ordered recipe list
    #[serde(default)]
    pub content: BTreeMap<String, Vec<MenuItem>>,
    /// Category key to the institutions receiving it
    #[serde(default)]
    pub assignments: BTreeMap<String, BTreeSet<String>>,
}

static EMPTY_DAY: DayPlan = DayPlan {
    content: BTreeMap::new(),
    assignments: BTreeMap::new(),
};

impl DayPlan {
    /// Content of a category; missing categories read as empty.
    pub fn items(&self, category: &str) -> &[MenuItem] {
        self.content
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether an institution is in a category's assignment set.
    ///
    /// A missing assignment set reads as empty.
    pub fn is_assigned(&self, category: &str, institution_id: &str) -> bool {
        self.assignments
            .get(category)
            .map(|ids| ids.contains(institution_id))
            .unwrap_or(false)
    }

    /// Builder: set a category's content from recipe ids.
    pub fn with_content<I, S>(mut self, category: &str, recipes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content.insert(
            category.to_string(),
            recipes.into_iter().map(MenuItem::recipe).collect(),
        );
        self
    }

    /// Builder: set a category's assignment set.
    pub fn with_assignment<I, S>(mut self, category: &str, institution_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignments.insert(
            category.to_string(),
            institution_ids.into_iter().map(Into::into).collect(),
        );
        self
    }
}

/// Point-in-time copy of one institution inside a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub id: String,
    pub name: String,
    pub is_intern: bool,
    #[serde(default)]
    pub diet_plan: DietPlan,
}

impl From<&Institution> for SnapshotEntry {
    fn from(institution: &Institution) -> Self {
        Self {
            id: institution.id.clone(),
            name: institution.name.clone(),
            is_intern: institution.is_intern,
            diet_plan: institution.diet_plan.clone(),
        }
    }
}

/// Institution data frozen into a published plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct InstitutionSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Actor who triggered the refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,
    /// Entries keyed by institution id
    #[serde(default)]
    pub institutions: BTreeMap<String, SnapshotEntry>,
}

impl InstitutionSnapshot {
    /// Freeze the given institutions.
    pub fn capture<'a>(
        institutions: impl IntoIterator<Item = &'a Institution>,
        generated_at: DateTime<Utc>,
        generated_by: Option<String>,
    ) -> Self {
        Self {
            generated_at,
            generated_by,
            institutions: institutions
                .into_iter()
                .map(|i| (i.id.clone(), SnapshotEntry::from(i)))
                .collect(),
        }
    }

    pub fn entry(&self, institution_id: &str) -> Option<&SnapshotEntry> {
        self.institutions.get(institution_id)
    }
}

/// The canonical, shared plan for one (year, week).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMenuPlan {
    pub year: i32,
    pub week: u32,
    #[serde(default)]
    pub days: BTreeMap<Weekday, DayPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_snapshot: Option<InstitutionSnapshot>,
    /// Set on synthesized plans that were never persisted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_placeholder: bool,
}

impl WeeklyMenuPlan {
    /// An empty plan with no days.
    pub fn new(year: i32, week: u32) -> Self {
        Self {
            year,
            week,
            days: BTreeMap::new(),
            institution_snapshot: None,
            is_placeholder: false,
        }
    }

    /// Day data; a missing weekday reads as an empty day.
    pub fn day(&self, day: Weekday) -> &DayPlan {
        self.days.get(&day).unwrap_or(&EMPTY_DAY)
    }

    /// Builder: set one day.
    pub fn with_day(mut self, day: Weekday, plan: DayPlan) -> Self {
        self.days.insert(day, plan);
        self
    }
}
