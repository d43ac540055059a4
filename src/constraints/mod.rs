//! Global constraints plugged into the propagator
//!
//! A constraint is initialized once per solve (after the initial propagation)
//! and checked after every propagation fixpoint. It reads state through
//! trackers and tile sets it registered during `init`, and reacts through
//! bans, selects or a forced contradiction.

use crate::{
    algorithm::executor::TilePropagator, analysis::model::TileValue, io::error::Result,
};

/// Connectivity over tracked cells
pub mod connected;
/// Global cardinality bounds
pub mod count;
/// Reachability and cut-vertex analysis for path constraints
pub mod path_graph;

/// Two-phase constraint protocol
pub trait TileConstraint<T: TileValue> {
    /// Register tile sets and trackers; may already ban or select
    ///
    /// # Errors
    ///
    /// Returns an error if the constraint refers to tiles or cells the
    /// propagator does not know
    fn init(&mut self, propagator: &mut TilePropagator<T>) -> Result<()>;

    /// Enforce the constraint against the current state
    fn check(&mut self, propagator: &mut TilePropagator<T>);
}
