//! Tests for solver defaults and limits

#[cfg(test)]
mod tests {
    use wavetile::io::configuration::{
        DEFAULT_BACKTRACK_DEPTH, DEFAULT_OUTPUT_SIZE, DEFAULT_PATTERN_SIZE, DEFAULT_SEED,
        DEFAULT_SYMMETRY, ENTROPY_TIE_EPSILON, MAX_GRID_DIMENSION, MAX_INDIVIDUAL_PROGRESS_BARS,
        OUTPUT_SUFFIX,
    };

    #[test]
    fn test_default_seed() {
        assert_eq!(DEFAULT_SEED, 42);
    }

    // Tests pattern defaults are usable by the overlapping model
    // Verified by setting symmetry outside 1..=8
    #[test]
    fn test_pattern_defaults() {
        assert!(DEFAULT_PATTERN_SIZE >= 1);
        assert!((1..=8).contains(&DEFAULT_SYMMETRY));
        assert!(DEFAULT_OUTPUT_SIZE <= MAX_GRID_DIMENSION);
    }

    #[test]
    fn test_command_line_backtracks_without_bound() {
        assert!(DEFAULT_BACKTRACK_DEPTH < 0);
    }

    #[test]
    fn test_limits() {
        assert_eq!(MAX_GRID_DIMENSION, 10_000);
        assert!(ENTROPY_TIE_EPSILON > 0.0 && ENTROPY_TIE_EPSILON < 1e-6);
        assert_eq!(MAX_INDIVIDUAL_PROGRESS_BARS, 5);
        assert_eq!(OUTPUT_SUFFIX, "_result");
    }
}
