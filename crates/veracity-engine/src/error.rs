//! Error types for engine operations

use crate::ConfigError;
use thiserror::Error;
use veracity_fusion::FusionError;
use veracity_ledger::LedgerError;
use veracity_trust::TrustError;

/// Errors that can occur during engine operations
///
/// Integrity findings are never errors: they come back inside a
/// [`ChainVerification`](veracity_trust::ChainVerification).
#[derive(Error, Debug)]
pub enum EngineError {
    /// Chain lookup or signing failure
    #[error("Trust error: {0}")]
    Trust(#[from] TrustError),

    /// Audit ledger failure
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Fusion failure
    #[error("Fusion error: {0}")]
    Fusion(#[from] FusionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Canonical JSON encoding of an analysis result failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
