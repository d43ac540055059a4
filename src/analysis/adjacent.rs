use crate::{
    algorithm::bitset::PatternSet,
    analysis::model::{AdjacencyTable, CompiledModel, TileMapping, TileModel, TileValue},
    io::error::{Result, invalid_parameter, unknown_tile},
    spatial::directions::{Direction, DirectionSet},
};
use std::collections::HashMap;

/// Model built from explicitly listed neighbour pairs
///
/// Each tile becomes one pattern. Declaring that `b` may sit next to `a`
/// along a direction also allows `a` next to `b` along the inverse.
#[derive(Clone, Debug)]
pub struct AdjacentModel<T> {
    directions: DirectionSet,
    tiles: Vec<T>,
    indices: HashMap<T, usize>,
    frequencies: Vec<f64>,
    rules: Vec<(usize, Direction, usize)>,
}

impl<T: TileValue> AdjacentModel<T> {
    /// Create an empty model over `directions`
    pub fn new(directions: DirectionSet) -> Self {
        Self {
            directions,
            tiles: Vec::new(),
            indices: HashMap::new(),
            frequencies: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Register a tile with frequency 1 if it is new; returns its pattern index
    pub fn add_tile(&mut self, tile: T) -> usize {
        if let Some(&index) = self.indices.get(&tile) {
            return index;
        }
        let index = self.tiles.len();
        self.indices.insert(tile.clone(), index);
        self.tiles.push(tile);
        self.frequencies.push(1.0);
        index
    }

    /// Allow every destination next to every source along `direction`
    ///
    /// # Errors
    ///
    /// Returns an error if `direction` is not part of the model's direction set
    pub fn add_adjacency(
        &mut self,
        sources: impl IntoIterator<Item = T>,
        destinations: impl IntoIterator<Item = T>,
        direction: Direction,
    ) -> Result<()> {
        if self.directions.index_of(direction).is_none() {
            return Err(invalid_parameter(
                "direction",
                &format!("{direction:?}"),
                &format!("not part of {:?}", self.directions),
            ));
        }
        let destinations: Vec<usize> = destinations
            .into_iter()
            .map(|tile| self.add_tile(tile))
            .collect();
        for source in sources {
            let source = self.add_tile(source);
            for &destination in &destinations {
                self.rules.push((source, direction, destination));
            }
        }
        Ok(())
    }

    /// Allow `destination` next to `source` along `direction`
    ///
    /// # Errors
    ///
    /// Returns an error if `direction` is not part of the model's direction set
    pub fn add_adjacency_pair(&mut self, source: T, destination: T, direction: Direction) -> Result<()> {
        self.add_adjacency([source], [destination], direction)
    }

    /// Set the weight of a tile, registering it if needed
    ///
    /// # Errors
    ///
    /// Returns an error if `frequency` is not a positive finite number
    pub fn set_frequency(&mut self, tile: T, frequency: f64) -> Result<()> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(invalid_parameter(
                "frequency",
                &frequency,
                &"must be positive and finite",
            ));
        }
        let index = self.add_tile(tile);
        if let Some(slot) = self.frequencies.get_mut(index) {
            *slot = frequency;
        }
        Ok(())
    }

    /// Give every registered tile weight 1
    pub fn set_uniform_frequency(&mut self) {
        self.frequencies.fill(1.0);
    }

    /// Weight of a tile
    ///
    /// # Errors
    ///
    /// Returns an error if the tile has not been registered
    pub fn frequency(&self, tile: &T) -> Result<f64> {
        self.indices
            .get(tile)
            .and_then(|&index| self.frequencies.get(index).copied())
            .ok_or_else(|| unknown_tile(tile))
    }

    /// Registered tiles in pattern order
    pub fn tiles(&self) -> &[T] {
        &self.tiles
    }

    /// Patterns of the tiles that may sit next to `tile` along `direction`
    ///
    /// # Errors
    ///
    /// Returns an error if the tile has not been registered
    pub fn allowed_neighbors(&self, tile: &T, direction: Direction) -> Result<PatternSet> {
        let index = *self.indices.get(tile).ok_or_else(|| unknown_tile(tile))?;
        let compiled = self.compile()?;
        Ok(self
            .directions
            .index_of(direction)
            .and_then(|d| compiled.adjacency.allowed(index, d).cloned())
            .unwrap_or_else(|| PatternSet::new(self.tiles.len())))
    }
}

impl<T: TileValue> TileModel<T> for AdjacentModel<T> {
    fn directions(&self) -> DirectionSet {
        self.directions
    }

    fn compile(&self) -> Result<CompiledModel<T>> {
        let mut adjacency = AdjacencyTable::new(self.tiles.len(), self.directions);
        for &(source, direction, destination) in &self.rules {
            adjacency.allow(source, direction, destination);
        }
        Ok(CompiledModel {
            adjacency,
            frequencies: self.frequencies.clone(),
            mapping: TileMapping::new(self.tiles.clone()),
        })
    }
}
