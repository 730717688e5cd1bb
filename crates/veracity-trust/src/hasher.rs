//! SHA-256 content hashing

use serde::Serialize;
use sha2::{Digest, Sha256};
use veracity_domain::ContentHasher;

/// SHA-256 of a UTF-8 string, as lowercase hex
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Content hasher producing 64-character SHA-256 hex digests
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn hash(&self, content: &str) -> String {
        sha256_hex(content)
    }
}

/// Hash the canonical JSON encoding of a value
///
/// Field order follows struct declaration order and maps are `BTreeMap`s, so
/// equal values always encode to equal strings.
pub fn hash_json<H, T>(hasher: &H, value: &T) -> Result<String, serde_json::Error>
where
    H: ContentHasher + ?Sized,
    T: Serialize + ?Sized,
{
    Ok(hasher.hash(&serde_json::to_string(value)?))
}
