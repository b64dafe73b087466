//! Error types for projection and snapshot operations.

use crate::registry::RegistryError;
use crate::store::StoreError;
use crate::types::InstitutionType;

/// Top-level error returned by the engine and the snapshot service.
///
/// Only `NotFound` and `Configuration` carry meaning for callers; missing
/// optional plan data never surfaces here, it is read as empty.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// Referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Deployment rule table is incomplete
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Requested week does not exist in the ISO calendar
    #[error("Invalid week: {year}-W{week:02}")]
    InvalidWeek { year: i32, week: u32 },

    /// Storage backend failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Registry source could not be loaded
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl ProjectionError {
    pub fn institution_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "institution",
            id: id.into(),
        }
    }

    pub fn plan_not_found(key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "plan",
            id: key.to_string(),
        }
    }

    pub fn missing_rule(institution_type: InstitutionType) -> Self {
        Self::Configuration(format!(
            "no visibility rule for institution type '{}'",
            institution_type
        ))
    }

    /// Whether the caller should report "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a deployment defect rather than a request problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Registry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = ProjectionError::institution_not_found("inst-9");
        assert!(err.is_not_found());
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "institution not found: inst-9");

        let err = ProjectionError::missing_rule(InstitutionType::School);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'school'"));

        let err = ProjectionError::InvalidWeek { year: 2024, week: 60 };
        assert_eq!(err.to_string(), "Invalid week: 2024-W60");
    }
}
