use bitvec::prelude::*;
use std::fmt;

/// Fixed-size set of pattern indices
///
/// Used for adjacency rows, tile sets and scratch unions during propagation.
/// Indices are 0-based; out-of-range inserts are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatternSet {
    bits: BitVec,
}

impl PatternSet {
    /// Create a set with no patterns present
    pub fn new(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![0; pattern_count],
        }
    }

    /// Create a set containing every pattern
    pub fn all(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![1; pattern_count],
        }
    }

    /// Build a set from explicit indices
    pub fn from_patterns(pattern_count: usize, patterns: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(pattern_count);
        for pattern in patterns {
            set.insert(pattern);
        }
        set
    }

    /// Capacity of the set
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Insert a pattern index
    pub fn insert(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, true);
        }
    }

    /// Remove a pattern index
    pub fn remove(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, false);
        }
    }

    /// Test pattern membership
    pub fn contains(&self, pattern: usize) -> bool {
        self.bits.get(pattern).as_deref() == Some(&true)
    }

    /// Add every pattern of `other` in-place
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Remove every pattern
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Test if no patterns are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count patterns in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate over present pattern indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all pattern indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternSet({} patterns: {:?})", self.count(), self.to_vec())
    }
}
