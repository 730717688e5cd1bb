//! Append-only audit ledger

use crate::manifest::{AuditManifest, LedgerIssue};
use crate::LedgerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use veracity_domain::{
    ArtifactId, AuditFilter, AuditRecord, ContentHasher, DecisionExplanation, Signer, ZERO_HASH,
};
use veracity_trust::{merkle_root, Sha256Hasher};

/// Record fields covered by the chain hash: everything except `chain_hash`
#[derive(Serialize)]
struct RecordBody<'a> {
    id: &'a ArtifactId,
    timestamp: &'a DateTime<Utc>,
    actor: &'a str,
    action: &'a str,
    resource: &'a str,
    decision: Option<&'a DecisionExplanation>,
    previous_hash: &'a str,
}

impl<'a> From<&'a AuditRecord> for RecordBody<'a> {
    fn from(record: &'a AuditRecord) -> Self {
        Self {
            id: &record.id,
            timestamp: &record.timestamp,
            actor: &record.actor,
            action: &record.action,
            resource: &record.resource,
            decision: record.decision.as_ref(),
            previous_hash: &record.previous_hash,
        }
    }
}

/// `hash(JSON(record without chain_hash) + previous_hash)`
pub(crate) fn compute_chain_hash<H: ContentHasher + ?Sized>(
    hasher: &H,
    record: &AuditRecord,
) -> Result<String, LedgerError> {
    let body = serde_json::to_string(&RecordBody::from(record))?;
    Ok(hasher.hash(&format!("{}{}", body, record.previous_hash)))
}

/// Replay linkage and chain hashes of an ordered record list
pub(crate) fn check_records<H: ContentHasher + ?Sized>(
    hasher: &H,
    records: &[AuditRecord],
) -> Result<Vec<LedgerIssue>, LedgerError> {
    let mut issues = Vec::new();
    let mut expected_previous = ZERO_HASH;

    for (index, record) in records.iter().enumerate() {
        if record.previous_hash != expected_previous {
            issues.push(LedgerIssue::BrokenLink {
                index,
                expected: expected_previous.to_string(),
                found: record.previous_hash.clone(),
            });
        }
        if compute_chain_hash(hasher, record)? != record.chain_hash {
            issues.push(LedgerIssue::HashMismatch {
                index,
                record_id: record.id,
            });
        }
        expected_previous = record.chain_hash.as_str();
    }

    Ok(issues)
}

/// In-memory, append-only sequence of hash-linked audit records
///
/// There is no update or delete operation.
#[derive(Debug, Clone)]
pub struct AuditLedger<H = Sha256Hasher> {
    hasher: H,
    records: Vec<AuditRecord>,
}

impl AuditLedger<Sha256Hasher> {
    /// Create an empty ledger hashing with SHA-256
    pub fn new() -> Self {
        Self::with_hasher(Sha256Hasher)
    }
}

impl Default for AuditLedger<Sha256Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ContentHasher> AuditLedger<H> {
    /// Create an empty ledger with a custom hasher
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            hasher,
            records: Vec::new(),
        }
    }

    /// Append a record linked to the current tail
    pub fn append(
        &mut self,
        actor: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
        decision: Option<DecisionExplanation>,
    ) -> Result<&AuditRecord, LedgerError> {
        let previous_hash = self.last_hash().to_string();
        let mut record = AuditRecord {
            id: ArtifactId::new(),
            timestamp: Utc::now(),
            actor: actor.into(),
            action: action.into(),
            resource: resource.into(),
            decision,
            chain_hash: String::new(),
            previous_hash,
        };
        record.chain_hash = compute_chain_hash(&self.hasher, &record)?;

        debug!(
            "Ledger append #{}: {} {} {}",
            self.records.len(),
            record.actor,
            record.action,
            record.resource
        );
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Records matching every predicate in `filter`, in append order
    pub fn query(&self, filter: &AuditFilter) -> Vec<&AuditRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// All records in append order
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Chain hash of the last record, or the zero sentinel
    pub fn last_hash(&self) -> &str {
        self.records
            .last()
            .map_or(ZERO_HASH, |r| r.chain_hash.as_str())
    }

    /// Merkle root over every record's chain hash
    pub fn merkle_root(&self) -> String {
        let leaves: Vec<String> = self.records.iter().map(|r| r.chain_hash.clone()).collect();
        merkle_root(&self.hasher, &leaves)
    }

    /// Replay the ledger's own linkage and chain hashes
    pub fn verify_integrity(&self) -> Result<Vec<LedgerIssue>, LedgerError> {
        check_records(&self.hasher, &self.records)
    }

    /// Export all records with a signed Merkle root
    pub fn export_manifest<S: Signer + ?Sized>(&self, signer: &S) -> Result<AuditManifest, LedgerError> {
        let merkle_root = self.merkle_root();
        let exported_at = Utc::now();
        let signature = signer.sign(&AuditManifest::signing_payload(&merkle_root, &exported_at));

        debug!("Exported manifest of {} records, root {}", self.records.len(), merkle_root);
        Ok(AuditManifest {
            records: self.records.clone(),
            merkle_root,
            exported_at,
            signature,
        })
    }
}
