//! Spatial data structures
//!
//! This module contains:
//! - Direction sets and their inverses
//! - Grid topology with optional periodic axes
//! - Dihedral transforms of square patterns

/// Neighbourhood directions
pub mod directions;
/// Dihedral symmetry of square arrays
pub mod symmetry;
/// Grid extent, indexing and neighbour moves
pub mod topology;

pub use topology::{Point, Topology};
