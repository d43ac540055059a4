//! Overlapping model: patterns are `n × n` windows of a sample
//!
//! Every window of the sample (wrapping around when the input is periodic) is
//! expanded into its dihedral variants and deduplicated; occurrence counts
//! become frequencies. Two patterns may be neighbours along a direction when
//! they agree wherever they overlap after shifting one cell that way.

use crate::{
    analysis::model::{AdjacencyTable, CompiledModel, TileMapping, TileModel, TileValue},
    io::error::{Result, SolverError, invalid_parameter},
    spatial::{
        directions::{Direction, DirectionSet},
        symmetry::dihedral_variants,
    },
};
use ndarray::{Array2, s};
use std::collections::HashMap;
use std::ops::Range;

/// Patterns and their frequencies extracted from one sample
#[derive(Clone, Debug)]
pub struct OverlappingModel<T> {
    pattern_size: usize,
    patterns: Vec<Array2<T>>,
    frequencies: Vec<f64>,
}

impl<T: TileValue> OverlappingModel<T> {
    /// Extract patterns from `sample`, indexed `[y, x]`
    ///
    /// `symmetry` is the number of dihedral variants per window (1..=8).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `pattern_size` is zero or `symmetry` is outside 1..=8
    /// - The sample is empty, or smaller than one window without periodic input
    pub fn create(
        sample: &Array2<T>,
        pattern_size: usize,
        periodic_input: bool,
        symmetry: usize,
    ) -> Result<Self> {
        if pattern_size == 0 {
            return Err(invalid_parameter(
                "pattern_size",
                &pattern_size,
                &"must be at least 1",
            ));
        }
        if !(1..=8).contains(&symmetry) {
            return Err(invalid_parameter("symmetry", &symmetry, &"must be in 1..=8"));
        }

        let (height, width) = sample.dim();
        if height == 0 || width == 0 {
            return Err(SolverError::InvalidSourceData {
                reason: "sample is empty".to_string(),
            });
        }
        if !periodic_input && (height < pattern_size || width < pattern_size) {
            return Err(SolverError::InvalidSourceData {
                reason: format!(
                    "{width}x{height} sample is smaller than a {pattern_size}x{pattern_size} pattern"
                ),
            });
        }

        let (rows, cols) = if periodic_input {
            (height, width)
        } else {
            (height - pattern_size + 1, width - pattern_size + 1)
        };

        let mut patterns: Vec<Array2<T>> = Vec::new();
        let mut frequencies: Vec<f64> = Vec::new();
        let mut seen: HashMap<Array2<T>, usize> = HashMap::new();

        for y in 0..rows {
            for x in 0..cols {
                let window = extract_window(sample, y, x, pattern_size)?;
                for variant in dihedral_variants(window, symmetry) {
                    if let Some(&index) = seen.get(&variant) {
                        if let Some(frequency) = frequencies.get_mut(index) {
                            *frequency += 1.0;
                        }
                    } else {
                        seen.insert(variant.clone(), patterns.len());
                        patterns.push(variant);
                        frequencies.push(1.0);
                    }
                }
            }
        }

        Ok(Self {
            pattern_size,
            patterns,
            frequencies,
        })
    }

    /// Side length of each pattern
    pub const fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    /// Distinct patterns in first-seen order
    pub fn patterns(&self) -> &[Array2<T>] {
        &self.patterns
    }

    /// Occurrence count of each pattern
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    fn agrees(&self, a: &Array2<T>, b: &Array2<T>, direction: Direction) -> bool {
        let [dx, dy, _] = direction.delta();
        let (a_rows, b_rows) = overlap(self.pattern_size, dy);
        let (a_cols, b_cols) = overlap(self.pattern_size, dx);
        a.slice(s![a_rows, a_cols]) == b.slice(s![b_rows, b_cols])
    }
}

/// Ranges of `a` and `b` that coincide when `b` sits `delta` cells after `a`
fn overlap(size: usize, delta: i32) -> (Range<usize>, Range<usize>) {
    let shift = (delta.unsigned_abs() as usize).min(size);
    if delta >= 0 {
        (shift..size, 0..size - shift)
    } else {
        (0..size - shift, shift..size)
    }
}

fn extract_window<T: Clone>(sample: &Array2<T>, y: usize, x: usize, size: usize) -> Result<Array2<T>> {
    let (height, width) = sample.dim();
    let mut values = Vec::with_capacity(size * size);
    for dy in 0..size {
        for dx in 0..size {
            let value = sample
                .get(((y + dy) % height, (x + dx) % width))
                .cloned()
                .ok_or_else(|| SolverError::InvalidSourceData {
                    reason: format!("window at ({x}, {y}) leaves the sample"),
                })?;
            values.push(value);
        }
    }
    Array2::from_shape_vec((size, size), values).map_err(|err| SolverError::InvalidSourceData {
        reason: err.to_string(),
    })
}

impl<T: TileValue> TileModel<T> for OverlappingModel<T> {
    fn directions(&self) -> DirectionSet {
        DirectionSet::Cartesian2d
    }

    fn compile(&self) -> Result<CompiledModel<T>> {
        let directions = DirectionSet::Cartesian2d;
        let mut adjacency = AdjacencyTable::new(self.patterns.len(), directions);
        for (a_index, a) in self.patterns.iter().enumerate() {
            for (b_index, b) in self.patterns.iter().enumerate() {
                for (direction_index, &direction) in directions.directions().iter().enumerate() {
                    if self.agrees(a, b, direction) {
                        adjacency.allow_one_sided(a_index, direction_index, b_index);
                    }
                }
            }
        }

        let tiles = self
            .patterns
            .iter()
            .map(|pattern| {
                pattern
                    .get((0, 0))
                    .cloned()
                    .ok_or_else(|| SolverError::InvalidSourceData {
                        reason: "empty pattern".to_string(),
                    })
            })
            .collect::<Result<Vec<T>>>()?;

        Ok(CompiledModel {
            adjacency,
            frequencies: self.frequencies.clone(),
            mapping: TileMapping::new(tiles),
        })
    }
}
