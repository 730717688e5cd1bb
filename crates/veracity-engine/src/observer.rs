//! Fire-and-forget notifications of completed engine operations

use serde::{Deserialize, Serialize};
use veracity_domain::{ArtifactId, DecisionKind};
use veracity_fusion::FusionStrategy;

/// An engine operation that completed and mutated state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Evidence was hashed and recorded on an ingest node
    DataIngested {
        /// Chain keyed by the ingest batch
        batch_id: ArtifactId,
        /// Source the evidence came from
        source_id: String,
        /// Number of evidence items
        item_count: usize,
    },

    /// An analysis produced an explanation and an analyze node
    AnalysisCompleted {
        /// Explanation id, also the chain key
        explanation_id: ArtifactId,
        /// Decision kind
        kind: DecisionKind,
        /// Overall confidence
        confidence: f64,
    },

    /// A fusion produced an intelligence product
    FusionCompleted {
        /// Product id, also the chain key
        product_id: ArtifactId,
        /// Strategy used
        strategy: FusionStrategy,
        /// Fused confidence
        confidence: f64,
    },

    /// Items were ranked
    PrioritizationCompleted {
        /// Explanation id
        explanation_id: ArtifactId,
        /// Number of items ranked
        item_count: usize,
    },

    /// A chain was replayed
    ChainVerified {
        /// Chain replayed
        chain_id: ArtifactId,
        /// Whether it passed
        valid: bool,
    },
}

impl EngineEvent {
    /// Short event name, e.g. "dataIngested"
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::DataIngested { .. } => "dataIngested",
            EngineEvent::AnalysisCompleted { .. } => "analysisCompleted",
            EngineEvent::FusionCompleted { .. } => "fusionCompleted",
            EngineEvent::PrioritizationCompleted { .. } => "prioritizationCompleted",
            EngineEvent::ChainVerified { .. } => "chainVerified",
        }
    }
}

/// Receives engine events after the mutation that produced them
///
/// Closures taking `&EngineEvent` implement this trait.
pub trait EngineObserver: Send + Sync {
    /// Handle one event; must not call back into the engine
    fn on_event(&self, event: &EngineEvent);
}

impl<F> EngineObserver for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn on_event(&self, event: &EngineEvent) {
        self(event)
    }
}
