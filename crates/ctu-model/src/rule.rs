use serde::{Deserialize, Serialize};

use crate::TrialId;

/// One boolean selection expression per trial, compiled from its curated
/// rows. An empty expression means no curated row produced any literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRule {
    pub trial_id: TrialId,
    pub expression: String,
}

impl SelectionRule {
    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }
}
