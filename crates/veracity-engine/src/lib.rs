//! Veracity Engine
//!
//! Facade that ties the chain of trust, the audit ledger and the decision
//! engines together behind one set of operations.
//!
//! # Overview
//!
//! The engine is responsible for:
//! - **Ingestion**: hashing extracted evidence and recording an ingest node
//! - **Explained analysis**: running caller analyses and explaining the result
//! - **Fusion and prioritization**: producing explained products and rankings
//! - **Verification**: replaying chains of trust and the audit ledger
//! - **Audit export**: signed Merkle manifests for offline review
//!
//! ## Operations
//!
//! | Operation | Chain node | Audit action |
//! |-----------|------------|--------------|
//! | `ingest_data` | ingest | `ingest` |
//! | `analyze_with_explanation` | analyze | `analyze` |
//! | `prioritize_with_justification` | none | `prioritize` |
//! | `fuse_intelligence` | transform, fuse, output | `fuse` |
//! | `verify_chain_of_trust` | none | `verify` |
//!
//! # Usage
//!
//! ```
//! use veracity_domain::{DecisionKind, EvidenceItem, FeatureContribution};
//! use veracity_engine::{AnalysisOutput, EngineConfig, ProvenanceEngine};
//! use veracity_trust::Sha256Hasher;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig {
//!     signing_secret: Some("doc-secret".to_string()),
//!     ..EngineConfig::default()
//! };
//! let mut engine = ProvenanceEngine::new(config)?;
//!
//! let evidence = vec![EvidenceItem::new(&Sha256Hasher, "humint:delta", "courier seen twice", 0.7)];
//! let analysis = engine.analyze_with_explanation(DecisionKind::RiskAssessment, &evidence, |_| {
//!     AnalysisOutput::new("elevated", vec![FeatureContribution::new("sightings", 0.8, 1.0)])
//! })?;
//!
//! println!("{}", engine.generate_human_readable_report(&analysis.explanation));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The engine can be configured via TOML:
//!
//! ```toml
//! actor_id = "analysis-cell-2"
//! signing_secret_env = "VERACITY_SIGNING_SECRET"
//! default_strategy = "BAYESIAN"
//! product_ttl_hours = 72
//! record_audit = true
//!
//! [explanation]
//! min_evidence = 3
//! confidence_limitation = 0.8
//!
//! [prioritization]
//! max_feature_contributions = 20
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod metrics;
mod observer;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Analysis, AnalysisOutput, ExtractedEvidence, Ingestion, ProvenanceEngine};
pub use error::EngineError;
pub use metrics::EngineMetrics;
pub use observer::{EngineEvent, EngineObserver};
