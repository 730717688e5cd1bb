//! Audit records of the append-only ledger

use crate::{ArtifactId, DecisionExplanation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the hash-linked audit ledger
///
/// For every record after the first, `previous_hash` equals the preceding
/// record's `chain_hash`; the first record carries [`crate::ZERO_HASH`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier
    pub id: ArtifactId,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
    /// Who performed it
    pub actor: String,
    /// Action name
    pub action: String,
    /// Resource acted upon
    pub resource: String,
    /// Explanation of the decision, if the action produced one
    pub decision: Option<DecisionExplanation>,
    /// Hash over this record's fields and `previous_hash`
    pub chain_hash: String,
    /// `chain_hash` of the preceding record
    pub previous_hash: String,
}

/// Predicates for querying the ledger; all supplied predicates must hold
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Exact actor match
    pub actor: Option<String>,
    /// Exact action match
    pub action: Option<String>,
    /// Records at or after this instant
    pub since: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Filter on actor
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Filter on action
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Filter on timestamp lower bound
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Whether `record` satisfies every supplied predicate
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.actor.as_ref().map_or(true, |a| &record.actor == a)
            && self.action.as_ref().map_or(true, |a| &record.action == a)
            && self.since.map_or(true, |t| record.timestamp >= t)
    }
}
