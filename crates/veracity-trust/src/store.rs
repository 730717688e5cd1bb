//! In-memory chain storage

use std::collections::HashMap;
use veracity_domain::{ArtifactId, ChainOfTrustNode, ChainStore};

/// `ChainStore` backed by a map of id → node list
///
/// Not internally synchronized; wrap it in a mutex when sharing across threads.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChainStore {
    chains: HashMap<ArtifactId, Vec<ChainOfTrustNode>>,
}

impl InMemoryChainStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chains held
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Whether no chain is held
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Mutable access to a stored chain, for tamper tests and repair tooling
    pub fn nodes_mut(&mut self, chain_id: &ArtifactId) -> Option<&mut Vec<ChainOfTrustNode>> {
        self.chains.get_mut(chain_id)
    }
}

impl ChainStore for InMemoryChainStore {
    fn append(&mut self, chain_id: ArtifactId, node: ChainOfTrustNode) {
        self.chains.entry(chain_id).or_default().push(node);
    }

    fn nodes(&self, chain_id: &ArtifactId) -> Option<&[ChainOfTrustNode]> {
        self.chains.get(chain_id).map(Vec::as_slice)
    }

    fn chain_ids(&self) -> Vec<ArtifactId> {
        let mut ids: Vec<ArtifactId> = self.chains.keys().copied().collect();
        ids.sort();
        ids
    }
}
