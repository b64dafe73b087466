//! Built-in registry defaults.
//!
//! Used when no registry document is configured. Every institution type has
//! a rule, so the defaults never produce a configuration error.

use super::{PopulationGroupMapping, Registries, VisibilityRule, VisibilityRuleSet};
use crate::catalog::{CategoryCatalog, CategoryEntry, DESSERT, MAIN_A, MAIN_B, SOUP};
use crate::types::InstitutionType;

impl Registries {
    /// Registries shipped with the portal.
    pub fn builtin() -> Self {
        Self {
            categories: builtin_catalog(),
            population_groups: builtin_population_groups(),
            rules: builtin_rules(),
        }
    }
}

fn builtin_catalog() -> CategoryCatalog {
    CategoryCatalog::new(vec![
        CategoryEntry::new(SOUP, "Soup", "soup-bowl"),
        CategoryEntry::new(MAIN_A, "Main course A", "plate"),
        CategoryEntry::new(MAIN_B, "Main course B", "plate"),
        CategoryEntry::new(DESSERT, "Dessert", "cake"),
    ])
}

fn builtin_population_groups() -> PopulationGroupMapping {
    PopulationGroupMapping::new([
        (
            "kindergarten children".to_string(),
            InstitutionType::Kindergarten,
        ),
        ("school children".to_string(), InstitutionType::School),
        ("pupils".to_string(), InstitutionType::School),
    ])
}

fn builtin_rules() -> VisibilityRuleSet {
    let all_courses = [SOUP, MAIN_A, MAIN_B, DESSERT];
    VisibilityRuleSet::new([
        (
            InstitutionType::Internal,
            VisibilityRule::new(all_courses, false),
        ),
        (
            InstitutionType::External,
            VisibilityRule::new(all_courses, false),
        ),
        (
            InstitutionType::Kindergarten,
            VisibilityRule::new(all_courses, true),
        ),
        (
            InstitutionType::School,
            VisibilityRule::new(all_courses, true),
        ),
    ])
}
