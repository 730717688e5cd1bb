//! Intelligence products: the materialized result of a fusion or analysis

use crate::{ArtifactId, ChainOfTrustNode, Classification, DataSource, DecisionExplanation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finished intelligence product. Created once per operation; immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceProduct {
    /// Unique identifier, also the key of its chain of trust
    pub id: ArtifactId,
    /// Title
    pub title: String,
    /// Highest classification among constituent sources
    pub classification: Classification,
    /// Summary
    pub summary: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Full chain of trust, first node first
    pub chain: Vec<ChainOfTrustNode>,
    /// Explanation of how the product was derived
    pub explanation: DecisionExplanation,
    /// Constituent sources
    pub sources: Vec<DataSource>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Optional expiry
    pub expires_at: Option<DateTime<Utc>>,
}

impl IntelligenceProduct {
    /// Whether the product has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now >= expiry)
    }
}

/// Highest classification among `sources`, unclassified when empty
pub fn derived_classification(sources: &[DataSource]) -> Classification {
    sources
        .iter()
        .map(|s| s.classification)
        .max()
        .unwrap_or(Classification::Unclassified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CredibilityGrade, ReliabilityGrade, SourceCategory};

    fn source(id: &str, classification: Classification) -> DataSource {
        DataSource::new(
            id,
            SourceCategory::Osint,
            classification,
            ReliabilityGrade::B,
            CredibilityGrade::ProbablyTrue,
        )
    }

    #[test]
    fn test_derived_classification_takes_maximum() {
        let sources = vec![
            source("a", Classification::Confidential),
            source("b", Classification::TopSecret),
            source("c", Classification::Unclassified),
        ];
        assert_eq!(derived_classification(&sources), Classification::TopSecret);
    }

    #[test]
    fn test_derived_classification_empty() {
        assert_eq!(derived_classification(&[]), Classification::Unclassified);
    }
}
