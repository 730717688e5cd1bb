//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the domain model and the
//! infrastructure crates that hash, sign and store.

use crate::{ArtifactId, ChainOfTrustNode};

/// Deterministic content fingerprinting
///
/// Implemented by the trust layer (veracity-trust)
pub trait ContentHasher {
    /// Hex digest of `content`; equal inputs always give equal digests
    fn hash(&self, content: &str) -> String;
}

/// Signing primitive used for node signatures, attestations and manifests
///
/// Implemented by the trust layer (veracity-trust)
pub trait Signer {
    /// Signature over `payload`
    fn sign(&self, payload: &str) -> String;

    /// Whether `signature` is the signature of `payload`
    fn verify(&self, payload: &str, signature: &str) -> bool {
        self.sign(payload) == signature
    }
}

/// Storage for per-product chains of trust
///
/// Chains are keyed by the id of the artifact they describe and kept in
/// append order. Implementations are not required to be internally
/// synchronized; callers serialize access.
pub trait ChainStore {
    /// Append a node to the chain keyed by `chain_id`, creating it if needed
    fn append(&mut self, chain_id: ArtifactId, node: ChainOfTrustNode);

    /// Nodes of a chain in append order, `None` for an unknown chain
    fn nodes(&self, chain_id: &ArtifactId) -> Option<&[ChainOfTrustNode]>;

    /// Last node of a chain
    fn tail(&self, chain_id: &ArtifactId) -> Option<&ChainOfTrustNode> {
        self.nodes(chain_id).and_then(|nodes| nodes.last())
    }

    /// Ids of every known chain
    fn chain_ids(&self) -> Vec<ArtifactId>;
}

impl<T: ContentHasher + ?Sized> ContentHasher for &T {
    fn hash(&self, content: &str) -> String {
        (**self).hash(content)
    }
}

impl<T: Signer + ?Sized> Signer for &T {
    fn sign(&self, payload: &str) -> String {
        (**self).sign(payload)
    }
}
