//! Compiled model shared by every solve: adjacency, frequencies, tile mapping
//!
//! Models are built by [`AdjacentModel`](crate::analysis::adjacent::AdjacentModel)
//! or [`OverlappingModel`](crate::analysis::overlapping::OverlappingModel) and
//! compiled once into a [`CompiledModel`]. The solver only ever sees pattern
//! indices; the [`TileMapping`] translates between those and user tiles.

use crate::algorithm::bitset::PatternSet;
use crate::io::error::{Result, SolverError, invalid_model, unknown_tile};
use crate::spatial::directions::{Direction, DirectionSet};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Values usable as tiles
pub trait TileValue: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> TileValue for T {}

/// Allowed neighbour patterns per (pattern, direction)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyTable {
    pattern_count: usize,
    directions: DirectionSet,
    allowed: Vec<PatternSet>,
}

impl AdjacencyTable {
    /// Create a table where nothing is allowed
    pub fn new(pattern_count: usize, directions: DirectionSet) -> Self {
        Self {
            pattern_count,
            directions,
            allowed: vec![PatternSet::new(pattern_count); pattern_count * directions.len()],
        }
    }

    /// Number of patterns
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Direction set the table is laid out for
    pub const fn directions(&self) -> DirectionSet {
        self.directions
    }

    /// Allow `neighbor` next to `pattern` along `direction`, and the inverse rule
    pub fn allow(&mut self, pattern: usize, direction: Direction, neighbor: usize) {
        let Some(index) = self.directions.index_of(direction) else {
            return;
        };
        let Some(inverse) = self.directions.index_of(direction.inverse()) else {
            return;
        };
        self.allow_one_sided(pattern, index, neighbor);
        self.allow_one_sided(neighbor, inverse, pattern);
    }

    /// Allow `neighbor` next to `pattern` along the direction at `direction_index` only
    pub fn allow_one_sided(&mut self, pattern: usize, direction_index: usize, neighbor: usize) {
        let slot = pattern * self.directions.len() + direction_index;
        if pattern < self.pattern_count
            && direction_index < self.directions.len()
            && let Some(set) = self.allowed.get_mut(slot)
        {
            set.insert(neighbor);
        }
    }

    /// Patterns allowed next to `pattern` along the direction at `direction_index`
    pub fn allowed(&self, pattern: usize, direction_index: usize) -> Option<&PatternSet> {
        if pattern >= self.pattern_count || direction_index >= self.directions.len() {
            return None;
        }
        self.allowed
            .get(pattern * self.directions.len() + direction_index)
    }

    /// Check that every rule has its inverse
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::AsymmetricAdjacency`] naming the first one-sided rule
    pub fn validate(&self) -> Result<()> {
        for pattern in 0..self.pattern_count {
            for (index, &direction) in self.directions.directions().iter().enumerate() {
                let Some(inverse) = self.directions.index_of(direction.inverse()) else {
                    continue;
                };
                let Some(allowed) = self.allowed(pattern, index) else {
                    continue;
                };
                for neighbor in allowed.iter() {
                    let mirrored = self
                        .allowed(neighbor, inverse)
                        .is_some_and(|set| set.contains(pattern));
                    if !mirrored {
                        return Err(SolverError::AsymmetricAdjacency {
                            pattern,
                            direction,
                            neighbor,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Many-to-one mapping from patterns to tiles
#[derive(Clone, Debug)]
pub struct TileMapping<T> {
    pattern_tiles: Vec<T>,
    tile_patterns: HashMap<T, PatternSet>,
}

impl<T: TileValue> TileMapping<T> {
    /// Build the mapping from the tile of each pattern
    pub fn new(pattern_tiles: Vec<T>) -> Self {
        let pattern_count = pattern_tiles.len();
        let mut tile_patterns: HashMap<T, PatternSet> = HashMap::new();
        for (pattern, tile) in pattern_tiles.iter().enumerate() {
            tile_patterns
                .entry(tile.clone())
                .or_insert_with(|| PatternSet::new(pattern_count))
                .insert(pattern);
        }
        Self {
            pattern_tiles,
            tile_patterns,
        }
    }

    /// Number of patterns
    pub fn pattern_count(&self) -> usize {
        self.pattern_tiles.len()
    }

    /// Tile a pattern stands for
    pub fn tile_of(&self, pattern: usize) -> Option<&T> {
        self.pattern_tiles.get(pattern)
    }

    /// Patterns standing for a tile
    pub fn patterns_of(&self, tile: &T) -> Option<&PatternSet> {
        self.tile_patterns.get(tile)
    }

    /// Check whether a tile is part of the model
    pub fn contains(&self, tile: &T) -> bool {
        self.tile_patterns.contains_key(tile)
    }

    /// Union of the patterns of several tiles
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnknownTile`] for the first tile the model does not know
    pub fn tile_set<'a>(&self, tiles: impl IntoIterator<Item = &'a T>) -> Result<TileSet>
    where
        T: 'a,
    {
        let mut patterns = PatternSet::new(self.pattern_count());
        for tile in tiles {
            let members = self.patterns_of(tile).ok_or_else(|| unknown_tile(tile))?;
            patterns.union_with(members);
        }
        Ok(TileSet { patterns })
    }
}

/// Handle for a set of tiles, resolved to pattern indices
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileSet {
    patterns: PatternSet,
}

impl TileSet {
    /// Wrap an explicit pattern set
    pub const fn from_patterns(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// Member patterns
    pub const fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Test pattern membership
    pub fn contains(&self, pattern: usize) -> bool {
        self.patterns.contains(pattern)
    }
}

/// Model compiled to pattern indices
#[derive(Clone, Debug)]
pub struct CompiledModel<T> {
    /// Neighbour rules
    pub adjacency: AdjacencyTable,
    /// Positive weight per pattern
    pub frequencies: Vec<f64>,
    /// Pattern to tile translation
    pub mapping: TileMapping<T>,
}

impl<T: TileValue> CompiledModel<T> {
    /// Number of patterns
    pub const fn pattern_count(&self) -> usize {
        self.adjacency.pattern_count()
    }

    /// Check the model is usable for solving
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model has no patterns
    /// - Table, frequency and mapping sizes disagree
    /// - A frequency is not a positive finite number
    /// - The adjacency table is asymmetric
    pub fn validate(&self) -> Result<()> {
        let pattern_count = self.pattern_count();
        if pattern_count == 0 {
            return Err(invalid_model(&"model has no patterns"));
        }
        if self.frequencies.len() != pattern_count || self.mapping.pattern_count() != pattern_count
        {
            return Err(invalid_model(&format!(
                "{pattern_count} patterns but {} frequencies and {} mapped tiles",
                self.frequencies.len(),
                self.mapping.pattern_count()
            )));
        }
        if let Some((pattern, frequency)) = self
            .frequencies
            .iter()
            .enumerate()
            .find(|&(_, &frequency)| !(frequency.is_finite() && frequency > 0.0))
        {
            return Err(invalid_model(&format!(
                "pattern {pattern} has frequency {frequency}"
            )));
        }
        self.adjacency.validate()
    }
}

/// Anything that can be compiled into a [`CompiledModel`]
pub trait TileModel<T: TileValue> {
    /// Neighbourhood the model is defined over
    fn directions(&self) -> DirectionSet;

    /// Produce pattern-level tables
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be expressed as patterns
    fn compile(&self) -> Result<CompiledModel<T>>;
}
