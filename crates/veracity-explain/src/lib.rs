//! Veracity Explanation Synthesizer
//!
//! Turns reasoning steps, feature contributions and evidence into a
//! [`DecisionExplanation`](veracity_domain::DecisionExplanation) an auditor
//! can read, and renders explanations as markdown.
//!
//! The synthesizer derives:
//! - a summary naming the strongest features and the evidence balance
//! - alternative outcomes sharing the residual probability mass
//! - limitations of the evidence base
//! - uncertainty factors with mitigations
//!
//! # Examples
//!
//! ```
//! use veracity_domain::{DecisionKind, FeatureContribution};
//! use veracity_explain::{render_report, ExplanationSynthesizer};
//!
//! let synthesizer = ExplanationSynthesizer::default();
//! let explanation = synthesizer.build_explanation(
//!     DecisionKind::RiskAssessment,
//!     "elevated",
//!     0.64,
//!     vec![],
//!     vec![FeatureContribution::new("recency", 0.9, 0.8)],
//!     vec![],
//!     vec![],
//! );
//!
//! assert_eq!(explanation.alternatives.len(), 2);
//! assert!(render_report(&explanation, 5).contains("recency"));
//! ```

#![warn(missing_docs)]

mod config;
mod report;
mod synthesizer;

pub use config::ExplanationConfig;
pub use report::render_report;
pub use synthesizer::ExplanationSynthesizer;
