//! Trust layer error types

use thiserror::Error;
use veracity_domain::ArtifactId;

/// Errors that can occur during trust operations
#[derive(Error, Debug)]
pub enum TrustError {
    /// No chain is stored under this id
    #[error("Chain not found: {0}")]
    ChainNotFound(ArtifactId),

    /// Canonical JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
