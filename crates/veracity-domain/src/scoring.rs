//! Scoring primitives shared by fusion, prioritization and analysis
//!
//! Everything here is deterministic: the same inputs always produce the same
//! weights and confidences, so derived numbers can be re-checked by auditors.

/// Reliability table indexed by grade rank (A..F)
pub const RELIABILITY_WEIGHTS: [f64; 6] = [1.0, 0.8, 0.6, 0.4, 0.2, 0.1];

/// Credibility table indexed by grade number minus one (1..6)
pub const CREDIBILITY_WEIGHTS: [f64; 6] = [1.0, 0.8, 0.6, 0.4, 0.2, 0.1];

/// Confidence assumed when there is nothing to derive it from
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Clamp a value into [0, 1]; NaN becomes 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Pass finite values through; NaN and infinities become 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Arithmetic mean, `None` for an empty input
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Weighted mean of `(value, weight)` pairs
///
/// Returns `None` when the total weight is not positive or not finite.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return None;
    }
    let weighted: f64 = pairs.iter().map(|(v, w)| v * w).sum();
    Some(weighted / total_weight)
}

/// Normalize weights so they sum to one; all zeros when the total is not positive
pub fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| w / total).collect()
}

/// Blend two confidences: `primary_share × primary + (1 - primary_share) × secondary`
pub fn blend(primary: f64, secondary: f64, primary_share: f64) -> f64 {
    clamp_unit(primary_share * primary + (1.0 - primary_share) * secondary)
}
