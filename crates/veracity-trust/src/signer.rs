//! Keyed-hash signing and attestations

use crate::hasher::sha256_hex;
use chrono::Utc;
use std::fmt;
use veracity_domain::{Attestation, AttesterKind, Signer};

/// Signs by hashing the payload followed by a process-held secret
///
/// This is a MAC-like construction: verification requires the same secret.
#[derive(Clone)]
pub struct KeyedHashSigner {
    secret: String,
}

impl KeyedHashSigner {
    /// Create a signer over `secret`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for KeyedHashSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedHashSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Signer for KeyedHashSigner {
    fn sign(&self, payload: &str) -> String {
        let mut keyed = String::with_capacity(payload.len() + self.secret.len());
        keyed.push_str(payload);
        keyed.push_str(&self.secret);
        sha256_hex(&keyed)
    }
}

/// Stamp the current time on `statement` and sign it
pub fn attest<S: Signer + ?Sized>(
    signer: &S,
    statement: impl Into<String>,
    attester_id: impl Into<String>,
    attester_kind: AttesterKind,
) -> Attestation {
    let statement = statement.into();
    let signature = signer.sign(&statement);
    Attestation {
        attester_id: attester_id.into(),
        attester_kind,
        statement,
        timestamp: Utc::now(),
        signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_is_keyed_hash() {
        let signer = KeyedHashSigner::new("k");
        assert_eq!(signer.sign("payload"), sha256_hex("payloadk"));
    }

    #[test]
    fn test_different_secrets_differ() {
        let a = KeyedHashSigner::new("alpha");
        let b = KeyedHashSigner::new("bravo");
        assert_ne!(a.sign("same"), b.sign("same"));
    }

    #[test]
    fn test_verify() {
        let signer = KeyedHashSigner::new("k");
        let signature = signer.sign("payload");

        assert!(signer.verify("payload", &signature));
        assert!(!signer.verify("payload!", &signature));
    }

    #[test]
    fn test_attest_signs_statement() {
        let signer = KeyedHashSigner::new("k");
        let attestation = attest(&signer, "fusion completed by engine", "engine", AttesterKind::Service);

        assert_eq!(attestation.attester_id, "engine");
        assert_eq!(attestation.attester_kind, AttesterKind::Service);
        assert!(signer.verify(&attestation.statement, &attestation.signature));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", KeyedHashSigner::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
