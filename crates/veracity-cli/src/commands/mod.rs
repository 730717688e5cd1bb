//! Command implementations.

pub mod chain;
pub mod manifest;
pub mod report;

pub use self::chain::execute_chain_verify;
pub use self::manifest::execute_manifest_verify;
pub use self::report::execute_report;
