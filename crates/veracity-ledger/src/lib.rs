//! Veracity Audit Ledger
//!
//! Append-only, hash-linked audit records with Merkle-root manifest export.
//!
//! # Architecture
//!
//! - Each record's `chain_hash` covers its own fields plus the previous
//!   record's `chain_hash`, so rewriting any record breaks every later link
//! - Export signs the Merkle root of all chain hashes together with the
//!   export time
//! - Manifests can be re-verified offline from the exported records alone
//!
//! # Examples
//!
//! ```
//! use veracity_ledger::AuditLedger;
//! use veracity_trust::KeyedHashSigner;
//!
//! let mut ledger = AuditLedger::new();
//! ledger.append("analyst:ana", "fuse", "product:42", None).unwrap();
//! ledger.append("auditor:bo", "verify", "product:42", None).unwrap();
//!
//! let signer = KeyedHashSigner::new("secret");
//! let manifest = ledger.export_manifest(&signer).unwrap();
//! assert!(manifest.verify(&signer).unwrap().valid);
//! ```
//!
//! # Thread Safety
//!
//! The ledger is not internally synchronized. Concurrent appends must be
//! serialized by the caller or the `previous_hash` linkage can interleave.

#![warn(missing_docs)]

mod ledger;
mod manifest;

pub use ledger::AuditLedger;
pub use manifest::{AuditManifest, LedgerIssue, ManifestVerification};

use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Canonical JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
