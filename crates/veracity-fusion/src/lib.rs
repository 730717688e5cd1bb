//! Veracity Evidence Fusion
//!
//! Weights sources by their admiralty grades and fuses their evidence into a
//! single [`IntelligenceProduct`](veracity_domain::IntelligenceProduct),
//! recording every stage on the product's chain of trust.
//!
//! # Strategies
//!
//! | Strategy | Combination |
//! |----------|-------------|
//! | `WeightedConsensus` | Σ(confidence × weight) / Σ(weight) |
//! | `Bayesian` | Weighted log-odds from a 0.5 prior |
//! | `DempsterShafer` | Dempster's rule on {H, ¬H}, pignistic result |
//! | `MajorityVote` | Weighted vote at 0.5, winning bloc's weighted mean |
//!
//! Only the averaging strategies (weighted consensus, majority vote) are
//! bounded by the input confidence range; the evidential ones accumulate
//! agreement past it.
//!
//! # Examples
//!
//! ```
//! use veracity_domain::{Classification, CredibilityGrade, DataSource, EvidenceItem, ReliabilityGrade, SourceCategory};
//! use veracity_fusion::{EvidenceFusionEngine, FusionStrategy, SourceEvidence};
//! use veracity_trust::{ChainOfTrustBuilder, InMemoryChainStore, KeyedHashSigner, Sha256Hasher};
//!
//! let source = DataSource::new(
//!     "sigint:intercept-4",
//!     SourceCategory::Sigint,
//!     Classification::Secret,
//!     ReliabilityGrade::B,
//!     CredibilityGrade::ProbablyTrue,
//! );
//! let evidence = vec![EvidenceItem::new(&Sha256Hasher, "sigint:intercept-4", "convoy departing", 0.8)];
//!
//! let mut builder = ChainOfTrustBuilder::new(KeyedHashSigner::new("secret"), InMemoryChainStore::new());
//! let product = EvidenceFusionEngine::default()
//!     .fuse(&mut builder, &[SourceEvidence::new(source, evidence)], FusionStrategy::WeightedConsensus)
//!     .unwrap();
//!
//! assert_eq!(product.chain.len(), 3);
//! assert_eq!(product.classification, Classification::Secret);
//! ```

#![warn(missing_docs)]

mod engine;
mod strategy;

pub use engine::{EvidenceFusionEngine, SourceEvidence};
pub use strategy::{FusionStrategy, Observation};

use thiserror::Error;

/// Errors that can occur during fusion
#[derive(Error, Debug)]
pub enum FusionError {
    /// Canonical JSON encoding of a node payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
