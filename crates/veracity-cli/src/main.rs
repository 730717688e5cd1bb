//! Veracity CLI - Offline verification of exported provenance artifacts.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use veracity_cli::cli::{ChainAction, ManifestAction};
use veracity_cli::commands;
use veracity_cli::config::load_engine_config;
use veracity_cli::{Cli, Command, Formatter};

/// Exit status when an artifact loads but fails verification
const EXIT_INTEGRITY_FAILURE: i32 = 2;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_INTEGRITY_FAILURE),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let config = load_engine_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading default configuration".to_string(),
    })?;
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    let valid = match cli.command {
        Command::Manifest {
            action: ManifestAction::Verify(args),
        } => {
            let file = args.file.display().to_string();
            commands::execute_manifest_verify(args, &config, &formatter)
                .with_context(|| format!("verifying manifest {}", file))?
        }
        Command::Chain {
            action: ChainAction::Verify(args),
        } => {
            let file = args.file.display().to_string();
            commands::execute_chain_verify(args, &config, &formatter)
                .with_context(|| format!("verifying product chain {}", file))?
        }
        Command::Report(args) => {
            let file = args.file.display().to_string();
            commands::execute_report(args, &config, &formatter)
                .with_context(|| format!("rendering report for {}", file))?;
            true
        }
    };

    Ok(valid)
}
