//! Configuration for the provenance engine
//!
//! Defines the signing identity, fusion defaults, product lifetime and the
//! explanation thresholds.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use veracity_explain::ExplanationConfig;
use veracity_fusion::FusionStrategy;
use veracity_prioritize::PrioritizationConfig;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Neither an inline secret nor the environment variable is set
    #[error("No signing secret configured (set signing_secret or {0})")]
    MissingSecret(String),
}

/// Configuration for the provenance engine
///
/// # Examples
///
/// ```
/// use veracity_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.actor_id, "veracity-engine");
/// assert!(config.record_audit);
///
/// let strict = EngineConfig::strict();
/// assert_eq!(strict.product_ttl_hours, Some(24));
///
/// let parsed = EngineConfig::from_toml("actor_id = \"analyst-7\"").unwrap();
/// assert_eq!(parsed.actor_id, "analyst-7");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Identity recorded as the ledger actor and chain component prefix
    #[serde(default = "default_actor_id")]
    pub actor_id: String,

    /// Inline signing secret; prefer the environment variable in deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,

    /// Environment variable holding the signing secret
    /// Default: VERACITY_SIGNING_SECRET
    #[serde(default = "default_secret_env")]
    pub signing_secret_env: String,

    /// Strategy used when a fusion request names none
    #[serde(default)]
    pub default_strategy: FusionStrategy,

    /// Lifetime of fused products in hours; `None` never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_ttl_hours: Option<u64>,

    /// Append a ledger record for every operation
    /// Default: true
    #[serde(default = "default_true")]
    pub record_audit: bool,

    /// Explanation thresholds
    #[serde(default)]
    pub explanation: ExplanationConfig,

    /// Prioritization limits
    #[serde(default)]
    pub prioritization: PrioritizationConfig,
}

fn default_actor_id() -> String {
    "veracity-engine".to_string()
}

fn default_secret_env() -> String {
    "VERACITY_SIGNING_SECRET".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actor_id: default_actor_id(),
            signing_secret: None,
            signing_secret_env: default_secret_env(),
            default_strategy: FusionStrategy::WeightedConsensus,
            product_ttl_hours: None,
            record_audit: true,
            explanation: ExplanationConfig::default(),
            prioritization: PrioritizationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Strict preset: strict explanation thresholds, products expire after a day
    pub fn strict() -> Self {
        Self {
            product_ttl_hours: Some(24),
            explanation: ExplanationConfig::strict(),
            ..Self::default()
        }
    }

    /// Lenient preset: lenient explanation thresholds, products never expire
    pub fn lenient() -> Self {
        Self {
            explanation: ExplanationConfig::lenient(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_id.trim().is_empty() {
            return Err(ConfigError::Invalid("actor_id must not be empty".to_string()));
        }
        if self.product_ttl_hours == Some(0) {
            return Err(ConfigError::Invalid(
                "product_ttl_hours must be greater than 0".to_string(),
            ));
        }
        self.explanation.validate().map_err(ConfigError::Invalid)?;
        self.prioritization.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// The signing secret: inline value first, then the environment
    pub fn resolve_secret(&self) -> Result<String, ConfigError> {
        if let Some(secret) = self.signing_secret.as_ref().filter(|s| !s.is_empty()) {
            return Ok(secret.clone());
        }
        std::env::var(&self.signing_secret_env)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSecret(self.signing_secret_env.clone()))
    }

    /// Product lifetime as a duration
    pub fn product_ttl(&self) -> Option<Duration> {
        self.product_ttl_hours
            .and_then(|hours| i64::try_from(hours).ok())
            .map(Duration::hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.actor_id, "veracity-engine");
        assert_eq!(config.signing_secret_env, "VERACITY_SIGNING_SECRET");
        assert_eq!(config.default_strategy, FusionStrategy::WeightedConsensus);
        assert_eq!(config.product_ttl_hours, None);
        assert!(config.record_audit);
        assert_eq!(config.prioritization.max_feature_contributions, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::strict().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
        assert_eq!(EngineConfig::strict().product_ttl(), Some(Duration::hours(24)));
        assert_eq!(EngineConfig::lenient().product_ttl(), None);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = EngineConfig::strict();
        config.default_strategy = FusionStrategy::DempsterShafer;
        config.signing_secret = Some("inline".to_string());

        let serialized = config.to_toml().unwrap();
        assert!(serialized.contains("default_strategy = \"DEMPSTER_SHAFER\""));
        assert!(serialized.contains("[explanation]"));

        let parsed = EngineConfig::from_toml(&serialized).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            default_strategy = "BAYESIAN"

            [explanation]
            min_evidence = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.default_strategy, FusionStrategy::Bayesian);
        assert_eq!(config.explanation.min_evidence, 5);
        assert_eq!(config.explanation.top_features, 3);
        assert_eq!(config.actor_id, "veracity-engine");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let config = EngineConfig {
            product_ttl_hours: Some(0),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.explanation.first_alternative_share = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inline_secret_wins() {
        let config = EngineConfig {
            signing_secret: Some("inline".to_string()),
            signing_secret_env: "VERACITY_TEST_SECRET_INLINE".to_string(),
            ..EngineConfig::default()
        };
        assert_eq!(config.resolve_secret().unwrap(), "inline");
    }

    #[test]
    fn test_secret_from_environment() {
        let var = "VERACITY_TEST_SECRET_FROM_ENV";
        std::env::set_var(var, "from-env");
        let config = EngineConfig {
            signing_secret_env: var.to_string(),
            ..EngineConfig::default()
        };
        assert_eq!(config.resolve_secret().unwrap(), "from-env");
        std::env::remove_var(var);
    }

    #[test]
    fn test_missing_secret() {
        let config = EngineConfig {
            signing_secret_env: "VERACITY_TEST_SECRET_UNSET".to_string(),
            ..EngineConfig::default()
        };
        match config.resolve_secret() {
            Err(ConfigError::MissingSecret(var)) => assert_eq!(var, "VERACITY_TEST_SECRET_UNSET"),
            other => panic!("Expected MissingSecret, got {:?}", other),
        }
    }
}
