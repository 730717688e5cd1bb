//! Manifest verification command.

use crate::cli::VerifyArgs;
use crate::config::resolve_secret;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use tracing::{info, warn};
use veracity_engine::EngineConfig;
use veracity_ledger::{AuditManifest, ManifestVerification};
use veracity_trust::KeyedHashSigner;

/// Load an exported manifest and verify it with `secret`.
pub fn verify_manifest_file(
    path: &Path,
    secret: &str,
) -> Result<(AuditManifest, ManifestVerification)> {
    let contents = std::fs::read_to_string(path)?;
    let manifest: AuditManifest = serde_json::from_str(&contents)?;
    let verification = manifest.verify(&KeyedHashSigner::new(secret))?;
    Ok((manifest, verification))
}

/// Execute `manifest verify`; returns whether the manifest is intact.
pub fn execute_manifest_verify(
    args: VerifyArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<bool> {
    let secret = resolve_secret(args.secret, config)?;
    let (manifest, verification) = verify_manifest_file(&args.file, &secret)?;

    if verification.valid {
        info!(
            "Manifest {} verified: {} records",
            args.file.display(),
            verification.record_count
        );
    } else {
        warn!(
            "Manifest {} failed verification with {} issues",
            args.file.display(),
            verification.issues.len()
        );
    }

    println!("{}", formatter.manifest_verification(&verification, &manifest)?);
    Ok(verification.valid)
}
