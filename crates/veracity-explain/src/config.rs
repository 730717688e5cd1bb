//! Thresholds used when synthesizing and rendering explanations

use serde::{Deserialize, Serialize};

/// Configuration for the explanation synthesizer
///
/// # Examples
///
/// ```
/// use veracity_explain::ExplanationConfig;
///
/// let config = ExplanationConfig::default();
/// assert_eq!(config.top_features, 3);
/// assert_eq!(config.min_evidence, 3);
///
/// let strict = ExplanationConfig::strict();
/// assert!(strict.confidence_limitation > config.confidence_limitation);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    /// Features named in the summary
    pub top_features: usize,

    /// Residual mass above which a first alternative is reported
    pub first_alternative_threshold: f64,

    /// Residual mass above which a second alternative is reported
    pub second_alternative_threshold: f64,

    /// Share of the residual mass carried by the first alternative
    pub first_alternative_share: f64,

    /// Share of the residual mass carried by the second alternative
    pub second_alternative_share: f64,

    /// Fewer evidence items than this is a limitation
    pub min_evidence: usize,

    /// Confidence below this is a limitation
    pub confidence_limitation: f64,

    /// Mean evidence confidence below this is a limitation
    pub evidence_confidence_limitation: f64,

    /// Feature weight below this counts as low
    pub low_weight_threshold: f64,

    /// Confidence below this is a high-impact uncertainty
    pub overall_uncertainty_threshold: f64,

    /// Features listed in rendered reports
    pub report_top_features: usize,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            top_features: 3,
            first_alternative_threshold: 0.1,
            second_alternative_threshold: 0.2,
            first_alternative_share: 0.6,
            second_alternative_share: 0.4,
            min_evidence: 3,
            confidence_limitation: 0.8,
            evidence_confidence_limitation: 0.7,
            low_weight_threshold: 0.3,
            overall_uncertainty_threshold: 0.7,
            report_top_features: 5,
        }
    }
}

impl ExplanationConfig {
    /// Strict preset: more evidence required, limitations flagged sooner
    pub fn strict() -> Self {
        Self {
            first_alternative_threshold: 0.05,
            second_alternative_threshold: 0.15,
            min_evidence: 5,
            confidence_limitation: 0.9,
            evidence_confidence_limitation: 0.8,
            low_weight_threshold: 0.4,
            overall_uncertainty_threshold: 0.8,
            ..Self::default()
        }
    }

    /// Lenient preset: fewer caveats, suited to exploratory analysis
    pub fn lenient() -> Self {
        Self {
            first_alternative_threshold: 0.2,
            second_alternative_threshold: 0.3,
            min_evidence: 1,
            confidence_limitation: 0.6,
            evidence_confidence_limitation: 0.5,
            low_weight_threshold: 0.2,
            overall_uncertainty_threshold: 0.5,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let unit = [
            ("first_alternative_threshold", self.first_alternative_threshold),
            ("second_alternative_threshold", self.second_alternative_threshold),
            ("first_alternative_share", self.first_alternative_share),
            ("second_alternative_share", self.second_alternative_share),
            ("confidence_limitation", self.confidence_limitation),
            ("evidence_confidence_limitation", self.evidence_confidence_limitation),
            ("low_weight_threshold", self.low_weight_threshold),
            ("overall_uncertainty_threshold", self.overall_uncertainty_threshold),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0.0, 1.0], got {}", name, value));
            }
        }
        if self.second_alternative_threshold < self.first_alternative_threshold {
            return Err(
                "second_alternative_threshold cannot be below first_alternative_threshold".to_string(),
            );
        }
        if (self.first_alternative_share + self.second_alternative_share - 1.0).abs() > 1e-9 {
            return Err("alternative shares must sum to 1.0".to_string());
        }
        if self.top_features == 0 {
            return Err("top_features must be greater than 0".to_string());
        }
        if self.report_top_features == 0 {
            return Err("report_top_features must be greater than 0".to_string());
        }
        Ok(())
    }
}
