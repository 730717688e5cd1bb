//! Configuration handling for the CLI.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use veracity_engine::EngineConfig;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

/// Load the engine configuration, or the defaults when no file is given.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// The signing secret: an explicit value first, then the configuration.
pub fn resolve_secret(explicit: Option<String>, config: &EngineConfig) -> Result<String> {
    match explicit.filter(|s| !s.is_empty()) {
        Some(secret) => Ok(secret),
        None => Ok(config.resolve_secret()?),
    }
}
