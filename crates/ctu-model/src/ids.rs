use std::fmt;

use crate::ModelError;

/// Registry identifier for one trial (e.g. an NCT id).
///
/// Trimmed and non-empty; the join and grouping key across the pipeline.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TrialId(String);

impl TrialId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidTrialId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an eligibility criterion class (e.g. `GeneAlterationCriterion`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CriterionClass(String);

impl CriterionClass {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidCriterionClass(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriterionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_id_trims_and_rejects_empty() {
        let id = TrialId::new("  NCT01234567 ").unwrap();
        assert_eq!(id.as_str(), "NCT01234567");
        assert!(TrialId::new("   ").is_err());
    }

    #[test]
    fn criterion_class_trims_and_rejects_empty() {
        let crit = CriterionClass::new(" PrimaryTumorCriterion ").unwrap();
        assert_eq!(crit.as_str(), "PrimaryTumorCriterion");
        assert!(CriterionClass::new("").is_err());
    }
}
