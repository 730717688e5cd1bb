//! Veracity CLI library.
//!
//! This library provides the offline auditor tooling behind the `veracity`
//! binary: verifying exported audit manifests and product chains, and
//! rendering explanation reports.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::OutputFormat;
pub use error::{CliError, Result};
pub use output::Formatter;
