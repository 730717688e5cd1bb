//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use std::fmt::Display;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use veracity_domain::{DecisionExplanation, IntelligenceProduct};
use veracity_ledger::{AuditManifest, ManifestVerification};
use veracity_trust::ChainVerification;

/// Hex characters shown for a truncated hash
const HASH_PREFIX: usize = 12;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of verifying an exported manifest.
    pub fn manifest_verification(
        &self,
        verification: &ManifestVerification,
        manifest: &AuditManifest,
    ) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(verification)?);
        }

        let mut lines = vec![
            self.status(verification.valid, "Manifest"),
            format!("Records: {}", verification.record_count),
            format!("Merkle root: {}", manifest.merkle_root),
            format!("Exported at: {}", manifest.exported_at.to_rfc3339()),
        ];

        if !manifest.records.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["#", "Timestamp", "Actor", "Action", "Resource", "Chain hash"]);
            for (index, record) in manifest.records.iter().enumerate() {
                builder.push_record([
                    index.to_string(),
                    record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    record.actor.clone(),
                    record.action.clone(),
                    record.resource.clone(),
                    short_hash(&record.chain_hash),
                ]);
            }
            lines.push(String::new());
            lines.push(table(builder));
        }

        lines.extend(self.issue_lines(&verification.issues));
        Ok(lines.join("\n"))
    }

    /// Format the result of replaying an exported product's chain.
    pub fn chain_verification(
        &self,
        verification: &ChainVerification,
        product: &IntelligenceProduct,
    ) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(verification)?);
        }

        let mut lines = vec![
            self.status(verification.valid, "Chain"),
            format!("Product: {} ({})", product.title, product.id),
            format!("Classification: {}", product.classification.as_str()),
            format!("Confidence: {:.3}", product.confidence),
            verification.report.clone(),
        ];

        if !product.chain.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["#", "Type", "Component", "Operation", "Output hash"]);
            for (index, node) in product.chain.iter().enumerate() {
                builder.push_record([
                    index.to_string(),
                    node.node_type.as_str().to_string(),
                    node.component.clone(),
                    node.operation.clone(),
                    short_hash(&node.output_hash),
                ]);
            }
            lines.push(String::new());
            lines.push(table(builder));
        }

        lines.extend(self.issue_lines(&verification.issues));
        Ok(lines.join("\n"))
    }

    /// Format a rendered markdown report.
    pub fn report(&self, markdown: &str, explanation: &DecisionExplanation) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(markdown.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "decision_id": explanation.id,
                "kind": explanation.kind,
                "confidence": explanation.confidence,
                "markdown": markdown,
            }))?),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn status(&self, valid: bool, subject: &str) -> String {
        if valid {
            self.success(&format!("{} verified", subject))
        } else {
            self.error(&format!("{} failed verification", subject))
        }
    }

    fn issue_lines<I: Display>(&self, issues: &[I]) -> Vec<String> {
        if issues.is_empty() {
            return Vec::new();
        }
        let mut lines = vec![String::new(), self.warning(&format!("{} issue(s):", issues.len()))];
        lines.extend(issues.iter().map(|issue| format!("  - {}", issue)));
        lines
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn table(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(HASH_PREFIX).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use veracity_ledger::AuditLedger;
    use veracity_trust::KeyedHashSigner;

    fn manifest() -> AuditManifest {
        let mut ledger = AuditLedger::new();
        ledger.append("analyst", "fuse", "product:1", None).unwrap();
        ledger.append("auditor", "verify", "product:1", None).unwrap();
        ledger.export_manifest(&KeyedHashSigner::new("k")).unwrap()
    }

    #[test]
    fn test_manifest_text_format() {
        let manifest = manifest();
        let verification = manifest.verify(&KeyedHashSigner::new("k")).unwrap();
        let formatter = Formatter::new(OutputFormat::Text, false);

        let output = formatter.manifest_verification(&verification, &manifest).unwrap();
        assert!(output.starts_with("✓ Manifest verified"));
        assert!(output.contains("Records: 2"));
        assert!(output.contains("Actor"));
        assert!(output.contains(&manifest.records[0].chain_hash[..HASH_PREFIX]));
        assert!(!output.contains("issue(s)"));
    }

    #[test]
    fn test_manifest_failure_lists_issues() {
        let manifest = manifest();
        let verification = manifest.verify(&KeyedHashSigner::new("wrong")).unwrap();
        let formatter = Formatter::new(OutputFormat::Text, false);

        let output = formatter.manifest_verification(&verification, &manifest).unwrap();
        assert!(output.starts_with("✗ Manifest failed verification"));
        assert!(output.contains("⚠ 1 issue(s):"));
    }

    #[test]
    fn test_manifest_json_format() {
        let manifest = manifest();
        let verification = manifest.verify(&KeyedHashSigner::new("k")).unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        let output = formatter.manifest_verification(&verification, &manifest).unwrap();
        let parsed: ManifestVerification = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, verification);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash("abcdef0123456789"), "abcdef012345");
        assert_eq!(short_hash("abc"), "abc");
    }
}
