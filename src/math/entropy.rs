//! Shannon entropy over frequency-weighted pattern sets
//!
//! Cells cache `Σw` and `Σw·ln w` for their remaining patterns, so entropy is
//! recomputed in constant time after each removal.

/// Contribution of one pattern to the `Σw·ln w` sum
pub fn weight_log_weight(weight: f64) -> f64 {
    if weight > 0.0 { weight * weight.ln() } else { 0.0 }
}

/// Entropy of a distribution given its cached sums
///
/// `H = ln(Σw) - (Σw·ln w) / Σw`; returns 0 for empty or degenerate sums.
pub fn entropy_from_sums(weight_sum: f64, weight_log_sum: f64) -> f64 {
    if weight_sum <= 0.0 {
        return 0.0;
    }
    let entropy = weight_sum.ln() - weight_log_sum / weight_sum;
    // Accumulated float error can push a single-pattern cell slightly negative
    entropy.max(0.0)
}
