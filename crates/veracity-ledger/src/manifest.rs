//! Exported audit manifests and their offline verification

use crate::ledger::check_records;
use crate::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use veracity_domain::{ArtifactId, AuditRecord, ContentHasher, Signer};
use veracity_trust::{merkle_root, Sha256Hasher};

/// A problem found while replaying ledger records or a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerIssue {
    /// `previous_hash` does not match the preceding record
    BrokenLink {
        /// Position of the record
        index: usize,
        /// Hash the record should point at
        expected: String,
        /// Hash it actually points at
        found: String,
    },

    /// Stored `chain_hash` differs from the recomputed one
    HashMismatch {
        /// Position of the record
        index: usize,
        /// Record id
        record_id: ArtifactId,
    },

    /// Exported Merkle root differs from the recomputed one
    MerkleRootMismatch {
        /// Root carried by the manifest
        exported: String,
        /// Root recomputed from the records
        recomputed: String,
    },

    /// Export signature does not cover root and timestamp
    SignatureInvalid,
}

impl fmt::Display for LedgerIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerIssue::BrokenLink { index, expected, found } => write!(
                f,
                "record #{} previous hash {} does not match {}",
                index, found, expected
            ),
            LedgerIssue::HashMismatch { index, record_id } => {
                write!(f, "record #{} ({}) chain hash mismatch", index, record_id)
            }
            LedgerIssue::MerkleRootMismatch { exported, recomputed } => write!(
                f,
                "merkle root {} does not match recomputed {}",
                exported, recomputed
            ),
            LedgerIssue::SignatureInvalid => write!(f, "manifest signature invalid"),
        }
    }
}

/// Signed export of the whole ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditManifest {
    /// Every record in append order
    pub records: Vec<AuditRecord>,
    /// Merkle root over the records' chain hashes
    pub merkle_root: String,
    /// Export time
    pub exported_at: DateTime<Utc>,
    /// Signature over `merkle_root + exported_at`
    pub signature: String,
}

/// Result of re-verifying a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestVerification {
    /// True when no issue was found
    pub valid: bool,
    /// Issues found
    pub issues: Vec<LedgerIssue>,
    /// Number of records replayed
    pub record_count: usize,
    /// Merkle root recomputed from the records
    pub recomputed_root: String,
}

impl AuditManifest {
    /// Payload covered by the export signature
    pub fn signing_payload(merkle_root: &str, exported_at: &DateTime<Utc>) -> String {
        format!("{}{}", merkle_root, exported_at.to_rfc3339())
    }

    /// Recompute the Merkle root from the exported records
    pub fn recompute_root<H: ContentHasher + ?Sized>(&self, hasher: &H) -> String {
        let leaves: Vec<String> = self.records.iter().map(|r| r.chain_hash.clone()).collect();
        merkle_root(hasher, &leaves)
    }

    /// Verify with SHA-256, the hasher the ledger uses by default
    pub fn verify<S: Signer + ?Sized>(&self, signer: &S) -> Result<ManifestVerification, LedgerError> {
        self.verify_with(&Sha256Hasher, signer)
    }

    /// Re-verify record hashes, linkage, Merkle root and signature
    pub fn verify_with<H, S>(&self, hasher: &H, signer: &S) -> Result<ManifestVerification, LedgerError>
    where
        H: ContentHasher + ?Sized,
        S: Signer + ?Sized,
    {
        let mut issues = check_records(hasher, &self.records)?;

        let recomputed_root = self.recompute_root(hasher);
        if recomputed_root != self.merkle_root {
            issues.push(LedgerIssue::MerkleRootMismatch {
                exported: self.merkle_root.clone(),
                recomputed: recomputed_root.clone(),
            });
        }

        let payload = Self::signing_payload(&self.merkle_root, &self.exported_at);
        if !signer.verify(&payload, &self.signature) {
            issues.push(LedgerIssue::SignatureInvalid);
        }

        Ok(ManifestVerification {
            valid: issues.is_empty(),
            issues,
            record_count: self.records.len(),
            recomputed_root,
        })
    }
}
