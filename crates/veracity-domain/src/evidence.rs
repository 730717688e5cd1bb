//! Evidence items extracted from data sources

use crate::scoring::clamp_unit;
use crate::{ArtifactId, ContentHasher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single piece of evidence
///
/// Created at ingest and never mutated afterwards; corrections are new items.
/// The content hash is derived from `content` at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Unique identifier
    pub id: ArtifactId,

    /// Identity of the source that supplied this item
    pub source_id: String,

    /// Textual content
    pub content: String,

    /// Hex digest of `content`
    pub content_hash: String,

    /// When the item was extracted
    pub extracted_at: DateTime<Utc>,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl EvidenceItem {
    /// Create an evidence item, hashing its content
    ///
    /// Confidence outside [0, 1] is clamped.
    pub fn new<H: ContentHasher + ?Sized>(
        hasher: &H,
        source_id: impl Into<String>,
        content: impl Into<String>,
        confidence: f64,
    ) -> Self {
        let content = content.into();
        let content_hash = hasher.hash(&content);
        Self {
            id: ArtifactId::new(),
            source_id: source_id.into(),
            content,
            content_hash,
            extracted_at: Utc::now(),
            confidence: clamp_unit(confidence),
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether `content_hash` still matches `content`
    pub fn verify_hash<H: ContentHasher + ?Sized>(&self, hasher: &H) -> bool {
        hasher.hash(&self.content) == self.content_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LenHasher;

    impl ContentHasher for LenHasher {
        fn hash(&self, content: &str) -> String {
            format!("len:{}", content.len())
        }
    }

    #[test]
    fn test_new_hashes_content() {
        let item = EvidenceItem::new(&LenHasher, "osint:feed", "convoy sighted", 0.7);

        assert_eq!(item.content_hash, "len:14");
        assert_eq!(item.source_id, "osint:feed");
        assert!(item.verify_hash(&LenHasher));
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(EvidenceItem::new(&LenHasher, "s", "x", 1.7).confidence, 1.0);
        assert_eq!(EvidenceItem::new(&LenHasher, "s", "x", -0.2).confidence, 0.0);
    }

    #[test]
    fn test_metadata_builder() {
        let item = EvidenceItem::new(&LenHasher, "s", "x", 0.5)
            .with_metadata("page", 4)
            .with_metadata("lang", "en");

        assert_eq!(item.metadata.get("page"), Some(&Value::from(4)));
        assert_eq!(item.metadata.len(), 2);
    }

    #[test]
    fn test_tampered_content_fails_hash_check() {
        let mut item = EvidenceItem::new(&LenHasher, "s", "abc", 0.5);
        item.content = "abcd".to_string();
        assert!(!item.verify_hash(&LenHasher));
    }
}
