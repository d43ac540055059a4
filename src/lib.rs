//! Constraint-propagation tile solver in the style of wave function collapse
//!
//! A [`TilePropagator`] fills a grid with tiles so that every pair of
//! neighbours is allowed by a model, optionally under global constraints
//! such as tile counts or path connectivity. Failed decisions can be undone
//! by backtracking.

#![deny(unsafe_code)]

/// Wave state, propagation, backtracking and the propagator itself
pub mod algorithm;
/// Tile models compiled into adjacency tables
pub mod analysis;
/// Global constraints: counts and connectivity
pub mod constraints;
/// Input/output operations and error handling
pub mod io;
/// Entropy and weighted choice
pub mod math;
/// Directions, grid topology and symmetry
pub mod spatial;

pub use algorithm::executor::{BacktrackType, Resolution, TilePropagator, TilePropagatorOptions};
pub use analysis::{adjacent::AdjacentModel, model::TileModel, overlapping::OverlappingModel};
pub use constraints::{
    TileConstraint,
    connected::{ConnectedConstraint, PathSpec},
    count::{CountComparison, CountConstraint},
};
pub use io::error::{Result, SolverError};
pub use spatial::directions::{Direction, DirectionSet};
pub use spatial::topology::{Point, Topology};
