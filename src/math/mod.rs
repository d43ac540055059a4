//! Mathematical utilities for the solver

/// Entropy of frequency-weighted pattern sets
pub mod entropy;
/// Weighted random choice
pub mod probability;
