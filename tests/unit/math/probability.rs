//! Tests for weighted random selection

#[cfg(test)]
mod tests {
    use wavetile::math::probability::weighted_choice;

    // Tests samples map onto cumulative weight intervals
    // Verified by using <= instead of < when consuming weight
    #[test]
    fn test_weighted_choice_intervals() {
        let weights = [1.0, 2.0, 1.0];
        assert_eq!(weighted_choice(&weights, 0.0), Some(0));
        assert_eq!(weighted_choice(&weights, 0.2), Some(0));
        assert_eq!(weighted_choice(&weights, 0.25), Some(1));
        assert_eq!(weighted_choice(&weights, 0.7), Some(1));
        assert_eq!(weighted_choice(&weights, 0.8), Some(2));
    }

    // Tests zero weights are skipped even at the upper edge
    #[test]
    fn test_zero_weights_never_chosen() {
        let weights = [0.0, 1.0, 0.0];
        for sample in [0.0, 0.5, 0.999_999] {
            assert_eq!(weighted_choice(&weights, sample), Some(1));
        }
        assert_eq!(weighted_choice(&weights, 1.0), Some(1));
    }

    #[test]
    fn test_empty_and_all_zero() {
        assert_eq!(weighted_choice(&[], 0.5), None);
        assert_eq!(weighted_choice(&[0.0, 0.0], 0.5), Some(0));
    }
}
