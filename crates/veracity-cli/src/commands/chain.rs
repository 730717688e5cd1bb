//! Product chain verification command.

use crate::cli::VerifyArgs;
use crate::config::resolve_secret;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use tracing::{info, warn};
use veracity_domain::IntelligenceProduct;
use veracity_engine::EngineConfig;
use veracity_trust::{ChainVerification, ChainVerifier, KeyedHashSigner};

/// Load an exported product and replay its embedded chain with `secret`.
pub fn verify_product_file(
    path: &Path,
    secret: &str,
) -> Result<(IntelligenceProduct, ChainVerification)> {
    let contents = std::fs::read_to_string(path)?;
    let product: IntelligenceProduct = serde_json::from_str(&contents)?;
    let signer = KeyedHashSigner::new(secret);
    let verification = ChainVerifier::new(&signer).verify_nodes(product.id, &product.chain);
    Ok((product, verification))
}

/// Execute `chain verify`; returns whether the chain is intact.
pub fn execute_chain_verify(
    args: VerifyArgs,
    config: &EngineConfig,
    formatter: &Formatter,
) -> Result<bool> {
    let secret = resolve_secret(args.secret, config)?;
    let (product, verification) = verify_product_file(&args.file, &secret)?;

    if verification.valid {
        info!("Product {} chain verified: {} nodes", product.id, verification.node_count);
    } else {
        warn!(
            "Product {} chain failed verification with {} issues",
            product.id,
            verification.issues.len()
        );
    }

    println!("{}", formatter.chain_verification(&verification, &product)?);
    Ok(verification.valid)
}
