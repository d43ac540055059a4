//! Tile models and their compiled form

/// Explicit neighbour-pair model
pub mod adjacent;
/// Compiled adjacency tables and tile mapping
pub mod model;
/// Sample-based overlapping window model
pub mod overlapping;
