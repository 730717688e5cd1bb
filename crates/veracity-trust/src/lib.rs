//! Veracity Trust
//!
//! Hashing, signing and chain-of-trust primitives.
//!
//! The trust layer provides:
//! - [`Sha256Hasher`]: deterministic 256-bit content digests
//! - [`KeyedHashSigner`] and [`attest`]: keyed-hash signatures and attestations
//! - [`ChainOfTrustBuilder`]: signed, parent-linked nodes per product
//! - [`merkle_root`]: pairwise aggregation of ordered hashes
//! - [`ChainVerifier`]: replay of a stored chain with a diagnostic report
//!
//! # Examples
//!
//! ```
//! use veracity_domain::{ArtifactId, NodeType};
//! use veracity_trust::{ChainOfTrustBuilder, InMemoryChainStore, KeyedHashSigner, NodeSpec};
//!
//! let signer = KeyedHashSigner::new("secret");
//! let mut builder = ChainOfTrustBuilder::new(signer, InMemoryChainStore::new());
//!
//! let product = ArtifactId::new();
//! builder.append(product, NodeSpec::new(NodeType::Ingest, "ingest", "load feed", vec![], "h1"));
//! builder.append(product, NodeSpec::new(NodeType::Output, "publisher", "publish", vec!["h1".into()], "h2"));
//!
//! let verification = builder.verify(&product).unwrap();
//! assert!(verification.valid);
//! ```
//!
//! # Signatures
//!
//! Signatures are keyed hashes (`sha256(payload ‖ secret)`), not asymmetric
//! signatures: anyone holding the secret can forge them, and third parties
//! cannot check them without it. The [`veracity_domain::Signer`] seam lets a
//! deployment swap in a real signature scheme without changing callers.

#![warn(missing_docs)]

mod builder;
mod error;
mod hasher;
mod merkle;
mod signer;
mod store;
mod verifier;

pub use builder::{ChainOfTrustBuilder, NodeSpec};
pub use error::TrustError;
pub use hasher::{hash_json, sha256_hex, Sha256Hasher};
pub use merkle::merkle_root;
pub use signer::{attest, KeyedHashSigner};
pub use store::InMemoryChainStore;
pub use verifier::{ChainVerification, ChainVerifier, VerificationIssue};
