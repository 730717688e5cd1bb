//! Veracity Domain Layer
//!
//! This crate contains the data model of the Veracity provenance core and the
//! trait seams every other layer depends upon. It performs no hashing, no I/O
//! and holds no process-wide state.
//!
//! ## Key Concepts
//!
//! - **Data source**: an intelligence source with an Admiralty-style
//!   reliability grade (A–F) and credibility grade (1–6)
//! - **Evidence item**: an immutable, content-hashed statement extracted from a source
//! - **Decision explanation**: reasoning steps, feature contributions,
//!   alternatives and uncertainty behind one derived conclusion
//! - **Chain of trust**: signed, parent-linked processing-step records
//! - **Audit record**: one entry of the append-only, hash-linked ledger
//!
//! ## Architecture
//!
//! - Value types only; derived fields (hashes, signatures) are computed by the
//!   infrastructure crates through the [`traits::ContentHasher`] and
//!   [`traits::Signer`] seams
//! - Storage is reached through [`traits::ChainStore`] so callers control
//!   lifetime and concurrency policy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod chain;
pub mod evidence;
pub mod explanation;
pub mod id;
pub mod product;
pub mod scoring;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use audit::{AuditFilter, AuditRecord};
pub use chain::{Attestation, AttesterKind, ChainOfTrustNode, NodeType};
pub use evidence::EvidenceItem;
pub use explanation::{
    AlternativeOutcome, DecisionExplanation, DecisionKind, Direction, FeatureContribution, Impact,
    ReasoningStep, UncertaintyFactor,
};
pub use id::ArtifactId;
pub use product::IntelligenceProduct;
pub use source::{Classification, CredibilityGrade, DataSource, ReliabilityGrade, SourceCategory};
pub use traits::{ChainStore, ContentHasher, Signer};

/// Length of a hex-encoded 256-bit digest
pub const DIGEST_HEX_LEN: usize = 64;

/// Previous-hash sentinel carried by the first record of a hash-linked sequence
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";
