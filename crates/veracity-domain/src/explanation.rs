//! Decision explanations: reasoning steps, feature contributions and uncertainty

use crate::scoring::finite_or_zero;
use crate::{ArtifactId, EvidenceItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Contributions smaller than this are reported as neutral
const NEUTRAL_EPSILON: f64 = 1e-9;

/// Kind of decision being explained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    /// Ranking of items by multiple criteria
    Prioritization,
    /// Fusion of multi-source evidence
    Fusion,
    /// Risk assessment
    RiskAssessment,
    /// Predicted link between entities
    LinkPrediction,
    /// Detected anomaly
    AnomalyDetection,
    /// Recommended course of action
    Recommendation,
}

impl DecisionKind {
    /// Upper snake case tag, e.g. "RISK_ASSESSMENT"
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Prioritization => "PRIORITIZATION",
            DecisionKind::Fusion => "FUSION",
            DecisionKind::RiskAssessment => "RISK_ASSESSMENT",
            DecisionKind::LinkPrediction => "LINK_PREDICTION",
            DecisionKind::AnomalyDetection => "ANOMALY_DETECTION",
            DecisionKind::Recommendation => "RECOMMENDATION",
        }
    }

    /// Human label: lower-cased tag with underscores replaced by spaces
    pub fn label(&self) -> String {
        self.as_str().to_lowercase().replace('_', " ")
    }
}

/// Qualitative direction of a feature's influence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Pushes toward the outcome
    Positive,
    /// Pushes against the outcome
    Negative,
    /// No material influence
    Neutral,
}

impl Direction {
    /// Direction implied by the sign of a contribution
    pub fn of(contribution: f64) -> Self {
        if contribution > NEUTRAL_EPSILON {
            Direction::Positive
        } else if contribution < -NEUTRAL_EPSILON {
            Direction::Negative
        } else {
            Direction::Neutral
        }
    }

    /// Arrow used in rendered reports
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Positive => "↑",
            Direction::Negative => "↓",
            Direction::Neutral => "→",
        }
    }
}

/// Weighted share of a named input factor toward a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Feature name
    pub name: String,
    /// Raw value
    pub value: f64,
    /// Assigned weight
    pub weight: f64,
    /// Computed contribution
    pub contribution: f64,
    /// Direction of influence
    pub direction: Direction,
    /// Human-readable explanation
    pub explanation: String,
}

impl FeatureContribution {
    /// Create a contribution as weight × value, with the value normalized to [-1, 1]
    pub fn new(name: impl Into<String>, value: f64, weight: f64) -> Self {
        let contribution = finite_or_zero(weight) * finite_or_zero(value).clamp(-1.0, 1.0);
        Self::with_contribution(name, value, weight, contribution)
    }

    /// Create a contribution whose share was computed by the caller
    ///
    /// Non-finite numbers are stored as 0 so the contribution always
    /// serializes to valid JSON.
    pub fn with_contribution(
        name: impl Into<String>,
        value: f64,
        weight: f64,
        contribution: f64,
    ) -> Self {
        let name = name.into();
        let value = finite_or_zero(value);
        let weight = finite_or_zero(weight);
        let contribution = finite_or_zero(contribution);
        let direction = Direction::of(contribution);
        let verb = match direction {
            Direction::Positive => "supports",
            Direction::Negative => "weighs against",
            Direction::Neutral => "has no material effect on",
        };
        let explanation = format!(
            "{} = {:.3} (weight {:.2}) {} the outcome",
            name, value, weight, verb
        );
        Self {
            name,
            value,
            weight,
            contribution,
            direction,
            explanation,
        }
    }

    /// Replace the generated explanation
    pub fn explained(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// One step of the reasoning chain behind a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// 1-based position, strictly increasing within an explanation
    pub sequence: u32,
    /// Operation name
    pub operation: String,
    /// Free-text description
    pub description: String,
    /// Identifiers consumed
    pub inputs: Vec<String>,
    /// Identifiers produced
    pub outputs: Vec<String>,
    /// Algorithm applied
    pub algorithm: String,
    /// Parameter bag
    pub parameters: BTreeMap<String, Value>,
    /// Confidence before the step
    pub confidence_in: f64,
    /// Confidence after the step
    pub confidence_out: f64,
    /// Wall-clock duration in microseconds
    pub duration_micros: u64,
    /// Human-readable narrative
    pub narrative: String,
}

impl ReasoningStep {
    /// Start a step; confidences default to 1.0 in and out
    pub fn new(sequence: u32, operation: impl Into<String>, algorithm: impl Into<String>) -> Self {
        Self {
            sequence,
            operation: operation.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            algorithm: algorithm.into(),
            parameters: BTreeMap::new(),
            confidence_in: 1.0,
            confidence_out: 1.0,
            duration_micros: 0,
            narrative: String::new(),
        }
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set consumed and produced identifiers
    pub fn io(mut self, inputs: Vec<String>, outputs: Vec<String>) -> Self {
        self.inputs = inputs;
        self.outputs = outputs;
        self
    }

    /// Add a parameter
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Set confidence before and after
    pub fn confidence(mut self, confidence_in: f64, confidence_out: f64) -> Self {
        self.confidence_in = finite_or_zero(confidence_in);
        self.confidence_out = finite_or_zero(confidence_out);
        self
    }

    /// Record the elapsed time
    pub fn duration(mut self, elapsed: Duration) -> Self {
        self.duration_micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self
    }

    /// Set the narrative
    pub fn narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = narrative.into();
        self
    }

    /// Change in confidence across the step
    pub fn confidence_delta(&self) -> f64 {
        self.confidence_out - self.confidence_in
    }
}

/// An outcome that was considered and rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeOutcome {
    /// Description of the alternative
    pub outcome: String,
    /// Probability mass assigned to it
    pub probability: f64,
    /// Why it was not chosen
    pub reason_rejected: String,
}

/// Impact tier of an uncertainty factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Minor effect on the decision
    Low,
    /// Material effect
    Medium,
    /// Decision may be wrong
    High,
}

impl Impact {
    /// Lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
        }
    }
}

/// A named source of uncertainty with a suggested mitigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyFactor {
    /// Factor name
    pub factor: String,
    /// Impact tier
    pub impact: Impact,
    /// Suggested mitigation
    pub mitigation: String,
}

/// Full explanation of one derived decision. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionExplanation {
    /// Unique identifier
    pub id: ArtifactId,
    /// Decision kind
    pub kind: DecisionKind,
    /// Outcome summary
    pub outcome: String,
    /// Overall confidence in [0, 1]
    pub confidence: f64,
    /// Ordered reasoning steps
    pub reasoning: Vec<ReasoningStep>,
    /// Feature contributions
    pub features: Vec<FeatureContribution>,
    /// Evidence supporting the outcome
    pub supporting_evidence: Vec<EvidenceItem>,
    /// Evidence contrary to the outcome
    pub contrary_evidence: Vec<EvidenceItem>,
    /// Alternatives considered
    pub alternatives: Vec<AlternativeOutcome>,
    /// Synthesized human-readable summary
    pub summary: String,
    /// Known limitations
    pub limitations: Vec<String>,
    /// Uncertainty factors
    pub uncertainty_factors: Vec<UncertaintyFactor>,
    /// When the explanation was built
    pub created_at: DateTime<Utc>,
}

impl DecisionExplanation {
    /// The `n` features with the largest absolute contribution
    ///
    /// Ties keep their original order.
    pub fn top_features(&self, n: usize) -> Vec<&FeatureContribution> {
        top_by_magnitude(&self.features, n)
    }

    /// Number of supporting plus contrary evidence items
    pub fn evidence_count(&self) -> usize {
        self.supporting_evidence.len() + self.contrary_evidence.len()
    }
}

/// The `n` features with the largest absolute contribution, stable on ties
pub fn top_by_magnitude(features: &[FeatureContribution], n: usize) -> Vec<&FeatureContribution> {
    let mut sorted: Vec<&FeatureContribution> = features.iter().collect();
    sorted.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    sorted.truncate(n);
    sorted
}
