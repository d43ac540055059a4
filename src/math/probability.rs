/// Weighted random selection from a uniform sample in `[0, 1)`
///
/// Returns the index into `weights` using the cumulative distribution. Zero
/// weights are never chosen unless every weight is zero, in which case the
/// first index is returned. Returns `None` for an empty slice.
pub fn weighted_choice(weights: &[f64], sample: f64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Some(0);
    }

    let mut remaining = sample * total;
    let mut last_positive = 0;
    for (i, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        last_positive = i;
        remaining -= weight;
        if remaining < 0.0 {
            return Some(i);
        }
    }
    Some(last_positive)
}
