//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Veracity CLI - Verify exported provenance artifacts offline.
#[derive(Debug, Parser)]
#[command(name = "veracity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Engine configuration file (used to resolve the signing secret)
    #[arg(short, long, global = true, env = "VERACITY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Audit manifest operations
    Manifest {
        #[command(subcommand)]
        action: ManifestAction,
    },

    /// Chain-of-trust operations
    Chain {
        #[command(subcommand)]
        action: ChainAction,
    },

    /// Render a decision explanation as markdown
    Report(ReportArgs),
}

/// Manifest actions.
#[derive(Debug, Subcommand)]
pub enum ManifestAction {
    /// Recompute record hashes, linkage, Merkle root and signature
    Verify(VerifyArgs),
}

/// Chain actions.
#[derive(Debug, Subcommand)]
pub enum ChainAction {
    /// Replay the chain of an exported intelligence product
    Verify(VerifyArgs),
}

/// Arguments shared by the verify commands.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Exported JSON file
    pub file: PathBuf,

    /// Signing secret (overrides the configuration)
    #[arg(short, long, env = "VERACITY_SIGNING_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Explanation or intelligence product JSON file
    pub file: PathBuf,

    /// Number of features to list (defaults to the configured value)
    #[arg(short, long)]
    pub top: Option<usize>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
