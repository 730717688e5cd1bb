//! Chain-of-trust node creation

use crate::signer::attest;
use crate::store::InMemoryChainStore;
use crate::verifier::{ChainVerification, ChainVerifier};
use crate::TrustError;
use chrono::Utc;
use tracing::debug;
use veracity_domain::chain::{attestation_statement, signing_payload};
use veracity_domain::{ArtifactId, AttesterKind, ChainOfTrustNode, ChainStore, NodeType, Signer};

/// What a new node records, before it is identified and signed
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    /// Stage recorded
    pub node_type: NodeType,
    /// Owning component
    pub component: String,
    /// Operation description
    pub operation: String,
    /// Content hashes consumed
    pub input_hashes: Vec<String>,
    /// Content hash produced
    pub output_hash: String,
}

impl NodeSpec {
    /// Describe a node
    pub fn new(
        node_type: NodeType,
        component: impl Into<String>,
        operation: impl Into<String>,
        input_hashes: Vec<String>,
        output_hash: impl Into<String>,
    ) -> Self {
        Self {
            node_type,
            component: component.into(),
            operation: operation.into(),
            input_hashes,
            output_hash: output_hash.into(),
        }
    }
}

/// Creates signed chain nodes and appends them to per-product chains
///
/// The builder trusts the parent id it is given; checking that parents exist
/// and link up is the job of [`ChainVerifier`].
pub struct ChainOfTrustBuilder<S, C = InMemoryChainStore> {
    signer: S,
    store: C,
    attester_kind: AttesterKind,
}

impl<S: Signer, C: ChainStore> ChainOfTrustBuilder<S, C> {
    /// Create a builder signing with `signer` and storing into `store`
    pub fn new(signer: S, store: C) -> Self {
        Self {
            signer,
            store,
            attester_kind: AttesterKind::Service,
        }
    }

    /// Attester kind stamped on node attestations (default: service)
    pub fn with_attester_kind(mut self, attester_kind: AttesterKind) -> Self {
        self.attester_kind = attester_kind;
        self
    }

    /// The signing primitive
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// The underlying chain store
    pub fn store(&self) -> &C {
        &self.store
    }

    /// Mutable access to the underlying chain store
    pub fn store_mut(&mut self) -> &mut C {
        &mut self.store
    }

    /// Build a signed node without storing it
    pub fn mint(&self, spec: NodeSpec, parent_id: Option<ArtifactId>) -> ChainOfTrustNode {
        let id = ArtifactId::new();
        let signature = self.signer.sign(&signing_payload(
            &id,
            spec.node_type,
            &spec.operation,
            &spec.output_hash,
        ));
        let attestation = attest(
            &self.signer,
            attestation_statement(&spec.operation, &spec.component),
            spec.component.clone(),
            self.attester_kind,
        );

        ChainOfTrustNode {
            id,
            parent_id,
            node_type: spec.node_type,
            component: spec.component,
            operation: spec.operation,
            created_at: Utc::now(),
            input_hashes: spec.input_hashes,
            output_hash: spec.output_hash,
            signature,
            attestation,
        }
    }

    /// Build a signed node with an explicit parent and append it to `chain_id`
    pub fn create_node(
        &mut self,
        chain_id: ArtifactId,
        spec: NodeSpec,
        parent_id: Option<ArtifactId>,
    ) -> ChainOfTrustNode {
        let node = self.mint(spec, parent_id);
        debug!(
            "Chain {}: appended {} node {} (parent {:?})",
            chain_id,
            node.node_type.as_str(),
            node.id,
            node.parent_id
        );
        self.store.append(chain_id, node.clone());
        node
    }

    /// Append a node linked to the current tail of `chain_id`
    pub fn append(&mut self, chain_id: ArtifactId, spec: NodeSpec) -> ChainOfTrustNode {
        let parent_id = self.store.tail(&chain_id).map(|tail| tail.id);
        self.create_node(chain_id, spec, parent_id)
    }

    /// Nodes of a chain in append order
    pub fn chain(&self, chain_id: &ArtifactId) -> Option<&[ChainOfTrustNode]> {
        self.store.nodes(chain_id)
    }

    /// Replay and check a stored chain
    pub fn verify(&self, chain_id: &ArtifactId) -> Result<ChainVerification, TrustError> {
        ChainVerifier::new(&self.signer).verify(&self.store, chain_id)
    }
}
