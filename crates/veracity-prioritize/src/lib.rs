//! Veracity Prioritization
//!
//! Ranks items by multiple weighted criteria and explains the ranking.
//!
//! The engine provides:
//! - Per-criterion scoring through caller-supplied evaluators
//! - Composite scores (Σ weighted score / Σ weight)
//! - Stable ranking: equal scores keep their input order
//! - Per-item justifications citing the strongest criteria
//! - A [`DecisionExplanation`](veracity_domain::DecisionExplanation) for the whole pass
//!
//! # Examples
//!
//! ```
//! use veracity_prioritize::{Criterion, PrioritizationEngine, PriorityItem};
//!
//! struct Lead { severity: f64, recency: f64 }
//!
//! let engine = PrioritizationEngine::default();
//! let criteria = vec![
//!     Criterion::new("severity", 2.0, |l: &Lead| l.severity),
//!     Criterion::new("recency", 1.0, |l: &Lead| l.recency),
//! ];
//! let items = vec![
//!     PriorityItem::new("lead-1", Lead { severity: 0.2, recency: 0.9 }),
//!     PriorityItem::new("lead-2", Lead { severity: 0.9, recency: 0.4 }),
//! ];
//!
//! let result = engine.prioritize(items, &criteria);
//! assert_eq!(result.ranked[0].item.id, "lead-2");
//! ```

#![warn(missing_docs)]

mod config;
mod engine;

pub use config::PrioritizationConfig;
pub use engine::{
    Criterion, CriterionScore, Prioritization, PrioritizationEngine, PriorityItem, RankedItem,
};
