//! Rule resolution: institution record to institution type and visibility rule.

use tracing::debug;

use crate::error::ProjectionError;
use crate::registry::{PopulationGroupMapping, Registries, VisibilityRule, VisibilityRuleSet};
use crate::types::{Institution, InstitutionType};

/// An institution's type together with the rule that applies to it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRule<'a> {
    pub institution_type: InstitutionType,
    pub rule: &'a VisibilityRule,
}

/// Resolves institutions against the population-group mapping and rule set.
pub struct RuleResolver<'a> {
    mapping: &'a PopulationGroupMapping,
    rules: &'a VisibilityRuleSet,
}

impl<'a> RuleResolver<'a> {
    pub fn new(mapping: &'a PopulationGroupMapping, rules: &'a VisibilityRuleSet) -> Self {
        Self { mapping, rules }
    }

    pub fn from_registries(registries: &'a Registries) -> Self {
        Self::new(&registries.population_groups, &registries.rules)
    }

    /// Institution type for a record.
    ///
    /// Internal institutions are always `Internal`; everyone else is
    /// classified by population group, defaulting to `External`.
    pub fn institution_type(&self, institution: &Institution) -> InstitutionType {
        self.classify(institution.is_intern, &institution.population_group)
    }

    fn classify(&self, is_intern: bool, population_group: &str) -> InstitutionType {
        if is_intern {
            return InstitutionType::Internal;
        }
        self.mapping
            .lookup(population_group)
            .unwrap_or(InstitutionType::External)
    }

    /// Resolve type and rule, failing if the rule table has no entry.
    pub fn resolve(&self, institution: &Institution) -> Result<ResolvedRule<'a>, ProjectionError> {
        self.resolve_as(institution, institution.is_intern)
    }

    /// Resolve with an internal flag taken from elsewhere, such as a
    /// plan's institution snapshot.
    pub fn resolve_as(
        &self,
        institution: &Institution,
        is_intern: bool,
    ) -> Result<ResolvedRule<'a>, ProjectionError> {
        let institution_type = self.classify(is_intern, &institution.population_group);
        let rule = self
            .rules
            .get(institution_type)
            .ok_or_else(|| ProjectionError::missing_rule(institution_type))?;

        debug!(
            institution_id = %institution.id,
            institution_type = %institution_type,
            diet_plan_based = rule.diet_plan_based,
            "Resolved visibility rule"
        );

        Ok(ResolvedRule {
            institution_type,
            rule,
        })
    }
}
