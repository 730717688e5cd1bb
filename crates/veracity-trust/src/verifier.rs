//! Chain replay and integrity diagnostics

use crate::TrustError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use veracity_domain::{ArtifactId, ChainOfTrustNode, ChainStore, Signer};

/// A structural problem found while replaying a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationIssue {
    /// Stored node signature differs from the recomputed one
    SignatureMismatch {
        /// Offending node
        node_id: ArtifactId,
    },

    /// Node does not point at the node stored before it
    BrokenLinkage {
        /// Offending node
        node_id: ArtifactId,
        /// Id of the preceding node
        expected: ArtifactId,
        /// Parent id actually recorded
        found: Option<ArtifactId>,
    },

    /// Attestation carries no signature
    MissingAttestation {
        /// Offending node
        node_id: ArtifactId,
    },

    /// Attestation signature does not cover its statement
    AttestationMismatch {
        /// Offending node
        node_id: ArtifactId,
    },
}

impl fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationIssue::SignatureMismatch { node_id } => {
                write!(f, "node {} signature mismatch", node_id)
            }
            VerificationIssue::BrokenLinkage {
                node_id,
                expected,
                found,
            } => match found {
                Some(found) => write!(
                    f,
                    "node {} parent {} does not match preceding node {}",
                    node_id, found, expected
                ),
                None => write!(
                    f,
                    "node {} has no parent but follows node {}",
                    node_id, expected
                ),
            },
            VerificationIssue::MissingAttestation { node_id } => {
                write!(f, "node {} attestation signature missing", node_id)
            }
            VerificationIssue::AttestationMismatch { node_id } => {
                write!(f, "node {} attestation signature invalid", node_id)
            }
        }
    }
}

/// Outcome of replaying one chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// Chain replayed
    pub chain_id: ArtifactId,
    /// True when no issue was found
    pub valid: bool,
    /// Issues in node order
    pub issues: Vec<VerificationIssue>,
    /// Number of nodes replayed
    pub node_count: usize,
    /// One-line human-readable summary
    pub report: String,
}

/// Replays stored chains and certifies their structure
///
/// This is a diagnostic: it catches accidental or partial corruption, not a
/// forger who holds the signing secret and re-signs every node.
pub struct ChainVerifier<'a, S: ?Sized> {
    signer: &'a S,
}

impl<'a, S: Signer + ?Sized> ChainVerifier<'a, S> {
    /// Create a verifier using the signing primitive nodes were signed with
    pub fn new(signer: &'a S) -> Self {
        Self { signer }
    }

    /// Verify the chain stored under `chain_id`
    pub fn verify<C: ChainStore + ?Sized>(
        &self,
        store: &C,
        chain_id: &ArtifactId,
    ) -> Result<ChainVerification, TrustError> {
        let nodes = store
            .nodes(chain_id)
            .ok_or(TrustError::ChainNotFound(*chain_id))?;
        Ok(self.verify_nodes(*chain_id, nodes))
    }

    /// Verify an ordered node list, e.g. one exported inside a product
    pub fn verify_nodes(&self, chain_id: ArtifactId, nodes: &[ChainOfTrustNode]) -> ChainVerification {
        let mut issues = Vec::new();
        let mut previous: Option<&ChainOfTrustNode> = None;

        for node in nodes {
            if !self.signer.verify(&node.signing_payload(), &node.signature) {
                issues.push(VerificationIssue::SignatureMismatch { node_id: node.id });
            }

            if let Some(prev) = previous {
                if node.parent_id != Some(prev.id) {
                    issues.push(VerificationIssue::BrokenLinkage {
                        node_id: node.id,
                        expected: prev.id,
                        found: node.parent_id,
                    });
                }
            }

            if node.attestation.signature.is_empty() {
                issues.push(VerificationIssue::MissingAttestation { node_id: node.id });
            } else if !self
                .signer
                .verify(&node.attestation.statement, &node.attestation.signature)
            {
                issues.push(VerificationIssue::AttestationMismatch { node_id: node.id });
            }

            previous = Some(node);
        }

        let report = render_report(&chain_id, nodes, &issues);
        if !issues.is_empty() {
            warn!("Chain {} failed verification: {} issue(s)", chain_id, issues.len());
        }

        ChainVerification {
            chain_id,
            valid: issues.is_empty(),
            issues,
            node_count: nodes.len(),
            report,
        }
    }
}

fn render_report(chain_id: &ArtifactId, nodes: &[ChainOfTrustNode], issues: &[VerificationIssue]) -> String {
    let span = match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => format!(
            " ({} → {})",
            first.node_type.as_str(),
            last.node_type.as_str()
        ),
        _ => String::new(),
    };
    let verdict = if issues.is_empty() {
        "all signatures and attestations valid".to_string()
    } else {
        issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    };
    format!("Chain {}: {} nodes{}; {}", chain_id, nodes.len(), span, verdict)
}
