//! Prioritization configuration

use serde::{Deserialize, Serialize};

/// Configuration for the prioritization engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizationConfig {
    /// Maximum feature contributions attached to the explanation
    pub max_feature_contributions: usize,

    /// Criteria cited in each item's justification
    pub justification_criteria: usize,
}

impl Default for PrioritizationConfig {
    fn default() -> Self {
        Self {
            max_feature_contributions: 20,
            justification_criteria: 3,
        }
    }
}

impl PrioritizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.justification_criteria == 0 {
            return Err("justification_criteria must be greater than 0".to_string());
        }
        Ok(())
    }
}
