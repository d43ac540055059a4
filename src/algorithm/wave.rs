//! Per-cell possibility state with incrementally maintained summaries
//!
//! All cells share one flat bit arena indexed `cell * pattern_count + pattern`.
//! Alongside it every cell caches its possibility count and the two sums that
//! entropy is derived from, so removals and restorations are O(1).

use crate::math::entropy::{entropy_from_sums, weight_log_weight};
use bitvec::prelude::*;

/// Possibility sets for every cell of a topology
#[derive(Clone, Debug)]
pub struct Wave {
    pattern_count: usize,
    cell_count: usize,
    possibilities: BitVec,
    counts: Vec<usize>,
    weight_sums: Vec<f64>,
    weight_log_sums: Vec<f64>,
    frequencies: Vec<f64>,
    weight_logs: Vec<f64>,
    initial_weight_sum: f64,
    initial_weight_log_sum: f64,
    decided_cells: usize,
    empty_cells: usize,
}

impl Wave {
    /// Create a wave with every pattern possible in every cell
    pub fn new(cell_count: usize, frequencies: &[f64]) -> Self {
        let pattern_count = frequencies.len();
        let weight_logs: Vec<f64> = frequencies.iter().copied().map(weight_log_weight).collect();
        let initial_weight_sum = frequencies.iter().sum();
        let initial_weight_log_sum = weight_logs.iter().sum();

        Self {
            pattern_count,
            cell_count,
            possibilities: bitvec![1; cell_count * pattern_count],
            counts: vec![pattern_count; cell_count],
            weight_sums: vec![initial_weight_sum; cell_count],
            weight_log_sums: vec![initial_weight_log_sum; cell_count],
            frequencies: frequencies.to_vec(),
            weight_logs,
            initial_weight_sum,
            initial_weight_log_sum,
            decided_cells: if pattern_count == 1 { cell_count } else { 0 },
            empty_cells: if pattern_count == 0 { cell_count } else { 0 },
        }
    }

    /// Restore every cell to the fully-possible state
    pub fn reset(&mut self) {
        self.possibilities.fill(true);
        self.counts.fill(self.pattern_count);
        self.weight_sums.fill(self.initial_weight_sum);
        self.weight_log_sums.fill(self.initial_weight_log_sum);
        self.decided_cells = if self.pattern_count == 1 {
            self.cell_count
        } else {
            0
        };
        self.empty_cells = if self.pattern_count == 0 {
            self.cell_count
        } else {
            0
        };
    }

    /// Number of patterns per cell
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of cells
    pub const fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Frequency weight of each pattern
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Test whether `pattern` is still possible at `cell`
    pub fn get(&self, cell: usize, pattern: usize) -> bool {
        pattern < self.pattern_count
            && self.possibilities.get(cell * self.pattern_count + pattern).as_deref() == Some(&true)
    }

    /// Remove a pattern from a cell
    ///
    /// Returns `true` if the pattern was possible before the call.
    pub fn remove(&mut self, cell: usize, pattern: usize) -> bool {
        if !self.get(cell, pattern) {
            return false;
        }
        self.possibilities
            .set(cell * self.pattern_count + pattern, false);

        let frequency = self.frequencies.get(pattern).copied().unwrap_or(0.0);
        let weight_log = self.weight_logs.get(pattern).copied().unwrap_or(0.0);
        if let Some(sum) = self.weight_sums.get_mut(cell) {
            *sum -= frequency;
        }
        if let Some(sum) = self.weight_log_sums.get_mut(cell) {
            *sum -= weight_log;
        }
        if let Some(count) = self.counts.get_mut(cell) {
            *count -= 1;
            match *count {
                1 => self.decided_cells += 1,
                0 => {
                    self.decided_cells -= 1;
                    self.empty_cells += 1;
                }
                _ => {}
            }
        }
        true
    }

    /// Put a previously removed pattern back into a cell
    ///
    /// Returns `true` if the pattern was absent before the call.
    pub fn restore(&mut self, cell: usize, pattern: usize) -> bool {
        if pattern >= self.pattern_count || cell >= self.cell_count || self.get(cell, pattern) {
            return false;
        }
        self.possibilities
            .set(cell * self.pattern_count + pattern, true);

        let frequency = self.frequencies.get(pattern).copied().unwrap_or(0.0);
        let weight_log = self.weight_logs.get(pattern).copied().unwrap_or(0.0);
        if let Some(sum) = self.weight_sums.get_mut(cell) {
            *sum += frequency;
        }
        if let Some(sum) = self.weight_log_sums.get_mut(cell) {
            *sum += weight_log;
        }
        if let Some(count) = self.counts.get_mut(cell) {
            *count += 1;
            match *count {
                1 => {
                    self.empty_cells -= 1;
                    self.decided_cells += 1;
                }
                2 => self.decided_cells -= 1,
                _ => {}
            }
        }
        true
    }

    /// Number of patterns still possible at `cell`
    pub fn count(&self, cell: usize) -> usize {
        self.counts.get(cell).copied().unwrap_or(0)
    }

    /// Weighted entropy of the patterns still possible at `cell`
    pub fn entropy(&self, cell: usize) -> f64 {
        let weight_sum = self.weight_sums.get(cell).copied().unwrap_or(0.0);
        let weight_log_sum = self.weight_log_sums.get(cell).copied().unwrap_or(0.0);
        entropy_from_sums(weight_sum, weight_log_sum)
    }

    /// Bits of one cell, one per pattern
    pub fn cell_bits(&self, cell: usize) -> &BitSlice {
        let start = (cell * self.pattern_count).min(self.possibilities.len());
        let end = (start + self.pattern_count).min(self.possibilities.len());
        self.possibilities
            .get(start..end)
            .unwrap_or_else(|| BitSlice::empty())
    }

    /// Iterate over patterns still possible at `cell`
    pub fn possible_patterns(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        self.cell_bits(cell).iter_ones()
    }

    /// The whole possibility arena
    pub fn possibilities(&self) -> &BitSlice {
        &self.possibilities
    }

    /// Single remaining pattern of a decided cell
    pub fn decided_pattern(&self, cell: usize) -> Option<usize> {
        (self.count(cell) == 1)
            .then(|| self.cell_bits(cell).first_one())
            .flatten()
    }

    /// Number of cells with exactly one possibility
    pub const fn decided_cells(&self) -> usize {
        self.decided_cells
    }

    /// Test whether some cell has no possibilities left
    pub const fn has_contradiction(&self) -> bool {
        self.empty_cells > 0
    }

    /// Test whether every cell has exactly one possibility
    pub const fn is_decided(&self) -> bool {
        self.decided_cells == self.cell_count
    }
}
