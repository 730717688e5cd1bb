//! Assembly of decision explanations

use crate::ExplanationConfig;
use chrono::Utc;
use veracity_domain::explanation::top_by_magnitude;
use veracity_domain::scoring::{clamp_unit, finite_or_zero, mean};
use veracity_domain::{
    AlternativeOutcome, ArtifactId, DecisionExplanation, DecisionKind, EvidenceItem,
    FeatureContribution, Impact, ReasoningStep, UncertaintyFactor,
};

/// Builds [`DecisionExplanation`]s from reasoning, features and evidence
///
/// Pure: the same inputs always yield the same summary, alternatives,
/// limitations and uncertainty factors. Only the id and timestamp are fresh.
#[derive(Debug, Clone, Default)]
pub struct ExplanationSynthesizer {
    config: ExplanationConfig,
}

impl ExplanationSynthesizer {
    /// Create a synthesizer with the given thresholds
    pub fn new(config: ExplanationConfig) -> Self {
        Self { config }
    }

    /// The active thresholds
    pub fn config(&self) -> &ExplanationConfig {
        &self.config
    }

    /// Assemble a complete explanation
    ///
    /// # Arguments
    ///
    /// * `kind` - Kind of decision
    /// * `outcome` - Outcome summary
    /// * `confidence` - Overall confidence, clamped into [0, 1]
    /// * `reasoning` - Ordered reasoning steps, renumbered 1..=n in the given order
    /// * `features` - Feature contributions
    /// * `supporting` - Evidence supporting the outcome
    /// * `contrary` - Evidence contrary to the outcome
    #[allow(clippy::too_many_arguments)]
    pub fn build_explanation(
        &self,
        kind: DecisionKind,
        outcome: impl Into<String>,
        confidence: f64,
        mut reasoning: Vec<ReasoningStep>,
        mut features: Vec<FeatureContribution>,
        supporting: Vec<EvidenceItem>,
        contrary: Vec<EvidenceItem>,
    ) -> DecisionExplanation {
        let outcome = outcome.into();
        let confidence = clamp_unit(confidence);

        for (sequence, step) in (1u32..).zip(reasoning.iter_mut()) {
            step.sequence = sequence;
            step.confidence_in = finite_or_zero(step.confidence_in);
            step.confidence_out = finite_or_zero(step.confidence_out);
        }
        for feature in &mut features {
            feature.value = finite_or_zero(feature.value);
            feature.weight = finite_or_zero(feature.weight);
            feature.contribution = finite_or_zero(feature.contribution);
        }

        let summary = self.summarize(
            kind,
            &outcome,
            confidence,
            &features,
            supporting.len(),
            contrary.len(),
        );
        let evidence_confidences: Vec<f64> = supporting
            .iter()
            .chain(contrary.iter())
            .map(|e| e.confidence)
            .collect();

        DecisionExplanation {
            id: ArtifactId::new(),
            kind,
            alternatives: self.alternatives(kind, confidence),
            limitations: self.limitations(confidence, &evidence_confidences),
            uncertainty_factors: self.uncertainty_factors(confidence, &features),
            outcome,
            confidence,
            reasoning,
            features,
            supporting_evidence: supporting,
            contrary_evidence: contrary,
            summary,
            created_at: Utc::now(),
        }
    }

    /// Human-readable one-paragraph summary
    pub fn summarize(
        &self,
        kind: DecisionKind,
        outcome: &str,
        confidence: f64,
        features: &[FeatureContribution],
        supporting: usize,
        contrary: usize,
    ) -> String {
        let top: Vec<&str> = top_by_magnitude(features, self.config.top_features)
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();
        let factors = if top.is_empty() {
            "none".to_string()
        } else {
            top.join(", ")
        };

        format!(
            "{}: {} ({:.1}% confidence). Key factors: {}. Evidence: {} supporting, {} contrary.",
            kind.label(),
            outcome,
            confidence * 100.0,
            factors,
            supporting,
            contrary
        )
    }

    /// Alternatives sharing the probability mass not assigned to the outcome
    pub fn alternatives(&self, kind: DecisionKind, confidence: f64) -> Vec<AlternativeOutcome> {
        let residual = 1.0 - confidence;
        let mut alternatives = Vec::new();

        if residual > self.config.first_alternative_threshold {
            alternatives.push(AlternativeOutcome {
                outcome: format!("alternative {} outcome", kind.label()),
                probability: residual * self.config.first_alternative_share,
                reason_rejected: "lower weighted evidence support".to_string(),
            });
        }
        if residual > self.config.second_alternative_threshold {
            alternatives.push(AlternativeOutcome {
                outcome: "no determination".to_string(),
                probability: residual * self.config.second_alternative_share,
                reason_rejected: "insufficient data for determination".to_string(),
            });
        }

        alternatives
    }

    /// Caveats about the evidence base and the confidence reached
    pub fn limitations(&self, confidence: f64, evidence_confidences: &[f64]) -> Vec<String> {
        let mut limitations = Vec::new();

        if evidence_confidences.len() < self.config.min_evidence {
            limitations.push(format!(
                "Only {} evidence item(s) considered; at least {} are needed for corroboration",
                evidence_confidences.len(),
                self.config.min_evidence
            ));
        }
        if confidence < self.config.confidence_limitation {
            limitations.push(format!(
                "Confidence {:.1}% is below the {:.0}% high-confidence threshold",
                confidence * 100.0,
                self.config.confidence_limitation * 100.0
            ));
        }
        if let Some(avg) = mean(evidence_confidences) {
            if avg < self.config.evidence_confidence_limitation {
                limitations.push(format!(
                    "Mean evidence confidence {:.2} is below {:.2}",
                    avg, self.config.evidence_confidence_limitation
                ));
            }
        }

        limitations
    }

    /// Named uncertainty sources with impact and mitigation
    pub fn uncertainty_factors(
        &self,
        confidence: f64,
        features: &[FeatureContribution],
    ) -> Vec<UncertaintyFactor> {
        let mut factors = Vec::new();

        let low_weight = features
            .iter()
            .filter(|f| f.weight < self.config.low_weight_threshold)
            .count();
        if low_weight * 2 > features.len() {
            factors.push(UncertaintyFactor {
                factor: "feature reliability".to_string(),
                impact: Impact::Medium,
                mitigation: format!(
                    "{} of {} features carry weight below {:.2}; corroborate them with stronger sources",
                    low_weight,
                    features.len(),
                    self.config.low_weight_threshold
                ),
            });
        }
        if confidence < self.config.overall_uncertainty_threshold {
            factors.push(UncertaintyFactor {
                factor: "overall confidence".to_string(),
                impact: Impact::High,
                mitigation: "Collect additional evidence before acting on this decision".to_string(),
            });
        }

        factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_trust::Sha256Hasher;

    fn evidence(confidences: &[f64]) -> Vec<EvidenceItem> {
        confidences
            .iter()
            .enumerate()
            .map(|(i, c)| EvidenceItem::new(&Sha256Hasher, "src", format!("item {}", i), *c))
            .collect()
    }

    fn features() -> Vec<FeatureContribution> {
        vec![
            FeatureContribution::new("volume", 0.2, 0.5),
            FeatureContribution::new("recency", 0.9, 0.8),
            FeatureContribution::new("proximity", -0.7, 0.6),
            FeatureContribution::new("chatter", 0.1, 0.2),
        ]
    }

    #[test]
    fn test_summary_names_top_three_features() {
        let synth = ExplanationSynthesizer::default();
        let explanation = synth.build_explanation(
            DecisionKind::RiskAssessment,
            "elevated",
            0.72,
            vec![],
            features(),
            evidence(&[0.8, 0.9]),
            evidence(&[0.3]),
        );

        assert_eq!(
            explanation.summary,
            "risk assessment: elevated (72.0% confidence). Key factors: recency, proximity, volume. \
             Evidence: 2 supporting, 1 contrary."
        );
        assert_eq!(explanation.evidence_count(), 3);
    }

    #[test]
    fn test_summary_without_features() {
        let synth = ExplanationSynthesizer::default();
        let summary = synth.summarize(DecisionKind::Fusion, "fused", 0.5, &[], 0, 0);
        assert!(summary.contains("Key factors: none."));
    }

    #[test]
    fn test_high_confidence_has_no_alternatives() {
        let synth = ExplanationSynthesizer::default();
        assert!(synth.alternatives(DecisionKind::Fusion, 0.95).is_empty());
    }

    #[test]
    fn test_single_alternative_between_thresholds() {
        let synth = ExplanationSynthesizer::default();
        let alternatives = synth.alternatives(DecisionKind::Fusion, 0.85);

        assert_eq!(alternatives.len(), 1);
        assert!((alternatives[0].probability - 0.09).abs() < 1e-9);
        assert_eq!(alternatives[0].reason_rejected, "lower weighted evidence support");
    }

    #[test]
    fn test_two_alternatives_split_residual() {
        let synth = ExplanationSynthesizer::default();
        let alternatives = synth.alternatives(DecisionKind::Prioritization, 0.5);

        assert_eq!(alternatives.len(), 2);
        assert!((alternatives[0].probability - 0.3).abs() < 1e-9);
        assert!((alternatives[1].probability - 0.2).abs() < 1e-9);
        assert_eq!(alternatives[1].reason_rejected, "insufficient data for determination");
    }

    #[test]
    fn test_limitations() {
        let synth = ExplanationSynthesizer::default();

        let all = synth.limitations(0.6, &[0.5, 0.6]);
        assert_eq!(all.len(), 3);
        assert!(all[0].starts_with("Only 2 evidence item(s)"));

        assert!(synth.limitations(0.9, &[0.8, 0.9, 0.75]).is_empty());
    }

    #[test]
    fn test_limitations_without_evidence() {
        let synth = ExplanationSynthesizer::default();
        let limitations = synth.limitations(0.9, &[]);
        assert_eq!(limitations.len(), 1);
    }

    #[test]
    fn test_feature_reliability_needs_majority_low_weight() {
        let synth = ExplanationSynthesizer::default();
        let half_low = vec![
            FeatureContribution::new("a", 0.5, 0.1),
            FeatureContribution::new("b", 0.5, 0.9),
        ];
        assert!(synth.uncertainty_factors(0.9, &half_low).is_empty());

        let mostly_low = vec![
            FeatureContribution::new("a", 0.5, 0.1),
            FeatureContribution::new("b", 0.5, 0.2),
            FeatureContribution::new("c", 0.5, 0.9),
        ];
        let factors = synth.uncertainty_factors(0.9, &mostly_low);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].factor, "feature reliability");
        assert_eq!(factors[0].impact, Impact::Medium);
    }

    #[test]
    fn test_low_confidence_is_high_impact() {
        let synth = ExplanationSynthesizer::default();
        let factors = synth.uncertainty_factors(0.4, &[]);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].factor, "overall confidence");
        assert_eq!(factors[0].impact, Impact::High);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let synth = ExplanationSynthesizer::default();
        let explanation =
            synth.build_explanation(DecisionKind::Recommendation, "act", 1.4, vec![], vec![], vec![], vec![]);
        assert_eq!(explanation.confidence, 1.0);
        assert!(explanation.alternatives.is_empty());
    }

    #[test]
    fn test_reasoning_is_renumbered_in_order() {
        let steps = vec![
            ReasoningStep::new(3, "collection", "none"),
            ReasoningStep::new(3, "correlation", "none"),
            ReasoningStep::new(0, "assessment", "none"),
        ];
        let explanation = ExplanationSynthesizer::default().build_explanation(
            DecisionKind::LinkPrediction,
            "credible",
            0.8,
            steps,
            vec![],
            vec![],
            vec![],
        );

        let sequences: Vec<u32> = explanation.reasoning.iter().map(|s| s.sequence).collect();
        let operations: Vec<&str> = explanation
            .reasoning
            .iter()
            .map(|s| s.operation.as_str())
            .collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(operations, vec!["collection", "correlation", "assessment"]);
    }

    #[test]
    fn test_non_finite_numbers_are_zeroed() {
        let mut corrupt = FeatureContribution::new("corrupt", 0.5, 0.5);
        corrupt.weight = f64::NAN;
        corrupt.contribution = f64::INFINITY;
        let mut step = ReasoningStep::new(1, "scoring", "none");
        step.confidence_out = f64::NAN;

        let explanation = ExplanationSynthesizer::default().build_explanation(
            DecisionKind::RiskAssessment,
            "moderate",
            0.6,
            vec![step],
            vec![corrupt],
            vec![],
            vec![],
        );

        assert_eq!(explanation.features[0].weight, 0.0);
        assert_eq!(explanation.features[0].contribution, 0.0);
        assert_eq!(explanation.reasoning[0].confidence_out, 0.0);
        let json = serde_json::to_string(&explanation).unwrap();
        let back: DecisionExplanation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, explanation);
    }

    #[test]
    fn test_lenient_config_drops_caveats() {
        let synth = ExplanationSynthesizer::new(ExplanationConfig::lenient());
        assert!(synth.limitations(0.65, &[0.6]).is_empty());
        assert!(synth.uncertainty_factors(0.65, &[]).is_empty());
    }
}
