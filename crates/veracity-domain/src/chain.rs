//! Chain-of-trust nodes and attestations

use crate::ArtifactId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage a chain node records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Raw data entered the system
    Ingest,
    /// Data was reshaped or weighted
    Transform,
    /// Data was enriched from another source
    Enrich,
    /// An analysis ran over evidence
    Analyze,
    /// Evidence from several sources was fused
    Fuse,
    /// A decision was taken
    Decide,
    /// A product was materialized
    Output,
}

impl NodeType {
    /// Lower-case stage name, also used inside node signatures
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Ingest => "ingest",
            NodeType::Transform => "transform",
            NodeType::Enrich => "enrich",
            NodeType::Analyze => "analyze",
            NodeType::Fuse => "fuse",
            NodeType::Decide => "decide",
            NodeType::Output => "output",
        }
    }
}

/// Kind of actor behind an attestation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttesterKind {
    /// An automated service
    Service,
    /// A human operator
    Operator,
    /// An auditor
    Auditor,
    /// The platform itself
    System,
}

/// Signed statement that an actor performed an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    /// Actor identity
    pub attester_id: String,
    /// Actor kind
    pub attester_kind: AttesterKind,
    /// Statement text
    pub statement: String,
    /// When the statement was made
    pub timestamp: DateTime<Utc>,
    /// Signature over `statement`
    pub signature: String,
}

/// One processing step in a product's chain of trust
///
/// Nodes of one chain form a singly-linked list through `parent_id`; only
/// the first node has no parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOfTrustNode {
    /// Unique identifier
    pub id: ArtifactId,
    /// Previous node, `None` for the first node of a chain
    pub parent_id: Option<ArtifactId>,
    /// Stage recorded
    pub node_type: NodeType,
    /// Owning component
    pub component: String,
    /// Operation description
    pub operation: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Content hashes consumed
    pub input_hashes: Vec<String>,
    /// Content hash produced
    pub output_hash: String,
    /// Signature over id, type, operation and output hash
    pub signature: String,
    /// Attestation of the operation
    pub attestation: Attestation,
}

impl ChainOfTrustNode {
    /// Payload covered by the node signature: id ‖ type ‖ operation ‖ output hash
    pub fn signing_payload(&self) -> String {
        signing_payload(&self.id, self.node_type, &self.operation, &self.output_hash)
    }
}

/// Concatenate the fields a node signature covers
pub fn signing_payload(
    id: &ArtifactId,
    node_type: NodeType,
    operation: &str,
    output_hash: &str,
) -> String {
    format!("{}{}{}{}", id, node_type.as_str(), operation, output_hash)
}

/// Attestation statement for an operation completed by a component
pub fn attestation_statement(operation: &str, component: &str) -> String {
    format!("{} completed by {}", operation, component)
}
