//! Connectivity of path cells
//!
//! Cells holding a path tile must form one connected region that includes
//! every relevant cell. Each check builds a graph over cells that may still be
//! on the path, fails if relevant cells are mutually unreachable, and selects
//! the path at every cell whose loss would disconnect them.

use crate::{
    algorithm::{
        bitset::PatternSet,
        executor::{Resolution, TilePropagator},
        selection::{PickContext, PickHeuristic, min_entropy_cell, weighted_pattern},
        trackers::{TrackerId, TrackerSet, Tristate},
        wave::Wave,
    },
    analysis::model::{TileSet, TileValue},
    constraints::{TileConstraint, path_graph::PathGraph},
    io::error::Result,
    spatial::{
        directions::Direction,
        topology::{Point, Topology},
    },
};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Which tiles form the path and how they connect
#[derive(Clone, Debug)]
pub enum PathSpec<T> {
    /// Any two adjacent path cells are connected
    Tiles {
        /// Path tiles
        tiles: Vec<T>,
        /// Cells that must lie on the path; empty means every definite path cell
        relevant_cells: Vec<Point>,
    },
    /// Adjacent cells connect only through matching exits
    Edged {
        /// Exit directions per tile; tiles with at least one exit are path tiles
        exits: HashMap<T, HashSet<Direction>>,
        /// Cells that must lie on the path; empty means every definite path cell
        relevant_cells: Vec<Point>,
    },
}

impl<T> PathSpec<T> {
    fn relevant_cells(&self) -> &[Point] {
        match self {
            Self::Tiles { relevant_cells, .. } | Self::Edged { relevant_cells, .. } => {
                relevant_cells
            }
        }
    }
}

/// Keeps path tiles connected
#[derive(Clone, Debug)]
pub struct ConnectedConstraint<T> {
    spec: PathSpec<T>,
    use_pick_heuristic: bool,
    state: Option<PathState>,
}

#[derive(Clone, Debug)]
struct PathState {
    path: TileSet,
    path_tracker: TrackerId,
    /// Per direction index: tracker of patterns exiting that way
    exit_trackers: Option<Vec<TrackerId>>,
    relevant: Vec<usize>,
}

impl<T: TileValue> ConnectedConstraint<T> {
    /// Constrain according to `spec`
    pub const fn new(spec: PathSpec<T>) -> Self {
        Self {
            spec,
            use_pick_heuristic: false,
            state: None,
        }
    }

    /// Bias decisions toward continuing existing paths
    #[must_use]
    pub const fn with_pick_heuristic(mut self, enabled: bool) -> Self {
        self.use_pick_heuristic = enabled;
        self
    }

    /// Path definition
    pub const fn spec(&self) -> &PathSpec<T> {
        &self.spec
    }

    fn path_tiles(&self) -> Vec<&T> {
        match &self.spec {
            PathSpec::Tiles { tiles, .. } => tiles.iter().collect(),
            PathSpec::Edged { exits, .. } => exits
                .iter()
                .filter(|(_, directions)| !directions.is_empty())
                .map(|(tile, _)| tile)
                .collect(),
        }
    }

    fn exit_trackers(&self, propagator: &mut TilePropagator<T>) -> Result<Option<Vec<TrackerId>>> {
        let PathSpec::Edged { exits, .. } = &self.spec else {
            return Ok(None);
        };
        let directions = propagator.topology().directions().directions();
        let mut trackers = Vec::with_capacity(directions.len());
        for direction in directions {
            let exiting = exits
                .iter()
                .filter(|(_, tile_exits)| tile_exits.contains(direction))
                .map(|(tile, _)| tile);
            let tile_set = propagator.create_tile_set(exiting)?;
            trackers.push(propagator.create_selected_tracker(&tile_set));
        }
        Ok(Some(trackers))
    }
}

impl<T: TileValue> TileConstraint<T> for ConnectedConstraint<T> {
    fn init(&mut self, propagator: &mut TilePropagator<T>) -> Result<()> {
        let path = propagator.create_tile_set(self.path_tiles())?;
        let path_tracker = propagator.create_selected_tracker(&path);
        let exit_trackers = self.exit_trackers(propagator)?;

        let mut relevant = Vec::with_capacity(self.spec.relevant_cells().len());
        for &point in self.spec.relevant_cells() {
            relevant.push(propagator.topology().checked_index(point)?);
        }
        for &index in &relevant {
            if propagator.select_index(index, &path) != Resolution::Undecided {
                break;
            }
        }

        if self.use_pick_heuristic {
            let pattern_count = propagator.wave().pattern_count();
            let path_patterns = path.patterns().clone();
            let other_patterns = PatternSet::from_patterns(
                pattern_count,
                (0..pattern_count).filter(|&pattern| !path_patterns.contains(pattern)),
            );
            propagator.set_pick_heuristic(Box::new(PathPickHeuristic {
                path_tracker,
                exit_trackers: exit_trackers.clone(),
                path_patterns,
                other_patterns,
            }));
        }

        self.state = Some(PathState {
            path,
            path_tracker,
            exit_trackers,
            relevant,
        });
        Ok(())
    }

    fn check(&mut self, propagator: &mut TilePropagator<T>) {
        let Some(state) = &self.state else {
            return;
        };
        let cell_count = propagator.topology().cell_count();
        let states: Vec<Tristate> = propagator
            .topology()
            .indices()
            .map(|index| {
                propagator
                    .selected_tristate(state.path_tracker, index)
                    .unwrap_or(Tristate::No)
            })
            .collect();

        let relevant: Vec<usize> = if state.relevant.is_empty() {
            (0..cell_count)
                .filter(|&index| states.get(index).is_some_and(|s| s.is_yes()))
                .collect()
        } else {
            state.relevant.clone()
        };
        if relevant
            .iter()
            .any(|&index| states.get(index).is_none_or(|s| s.is_no()))
        {
            trace!("Relevant cell can no longer hold a path tile");
            propagator.set_contradiction();
            return;
        }

        let graph = build_graph(propagator, state, &states);
        let Some(separating) = graph.separating_nodes(&relevant) else {
            trace!(relevant = relevant.len(), "Path disconnected");
            propagator.set_contradiction();
            return;
        };

        for (index, &cut) in separating.iter().enumerate() {
            let maybe = states.get(index).is_some_and(|s| s.is_maybe());
            if cut && maybe && propagator.select_index(index, &state.path) != Resolution::Undecided
            {
                return;
            }
        }
    }
}

fn build_graph<T: TileValue>(
    propagator: &TilePropagator<T>,
    state: &PathState,
    states: &[Tristate],
) -> PathGraph {
    let topology = propagator.topology();
    let directions = topology.directions();
    let walkable = |index: usize| states.get(index).is_some_and(|s| !s.is_no());
    let exits = |tracker: Option<&TrackerId>, index: usize| {
        tracker
            .and_then(|&id| propagator.selected_tristate(id, index))
            .is_some_and(|state| !state.is_no())
    };

    let mut graph = PathGraph::new(topology.cell_count());
    for index in topology.indices().filter(|&index| walkable(index)) {
        for (direction_index, &direction) in directions.directions().iter().enumerate() {
            let Some(neighbor) = topology.try_move_index(index, direction) else {
                continue;
            };
            if neighbor <= index || !walkable(neighbor) {
                continue;
            }
            let connected = match &state.exit_trackers {
                None => true,
                Some(trackers) => {
                    let inverse = directions.inverse_index(direction_index);
                    exits(trackers.get(direction_index), index)
                        && exits(inverse.and_then(|i| trackers.get(i)), neighbor)
                }
            };
            if connected {
                graph.connect(index, neighbor);
            }
        }
    }
    graph
}

/// Decision rule that grows paths from cells already on them
///
/// Takes the minimum-entropy cell as usual. If a definite path cell next to it
/// can connect into it, a path pattern is preferred there. Once some path
/// exists, other cells prefer non-path patterns so new disconnected pieces are
/// rarely started. Before that, the choice is the plain weighted one.
struct PathPickHeuristic {
    path_tracker: TrackerId,
    exit_trackers: Option<Vec<TrackerId>>,
    path_patterns: PatternSet,
    other_patterns: PatternSet,
}

impl PathPickHeuristic {
    /// Whether any cell is already definitely on the path
    fn path_started(&self, wave: &Wave, trackers: &TrackerSet) -> bool {
        trackers.get(self.path_tracker).is_some_and(|path| {
            (0..wave.cell_count()).any(|cell| path.tristate(cell, wave).is_yes())
        })
    }

    fn touches_path(&self, wave: &Wave, topology: &Topology, trackers: &TrackerSet, cell: usize) -> bool {
        let directions = topology.directions();
        let Some(path) = trackers.get(self.path_tracker) else {
            return false;
        };
        directions
            .directions()
            .iter()
            .enumerate()
            .any(|(direction_index, &direction)| {
                let Some(neighbor) = topology.try_move_index(cell, direction) else {
                    return false;
                };
                if !path.tristate(neighbor, wave).is_yes() {
                    return false;
                }
                let Some(exit_trackers) = &self.exit_trackers else {
                    return true;
                };
                directions
                    .inverse_index(direction_index)
                    .and_then(|inverse| exit_trackers.get(inverse))
                    .and_then(|&id| trackers.get(id))
                    .is_some_and(|tracker| !tracker.tristate(neighbor, wave).is_no())
            })
    }
}

impl PickHeuristic for PathPickHeuristic {
    fn pick(
        &mut self,
        context: &PickContext<'_>,
        random: &mut dyn FnMut() -> f64,
    ) -> Option<(usize, usize)> {
        let cell = min_entropy_cell(context.wave, random)?;
        let preferred = if self.touches_path(context.wave, context.topology, context.trackers, cell) {
            Some(&self.path_patterns)
        } else if self.path_started(context.wave, context.trackers) {
            Some(&self.other_patterns)
        } else {
            None
        };
        let pattern = weighted_pattern(context.wave, cell, preferred, random)
            .or_else(|| weighted_pattern(context.wave, cell, None, random))?;
        Some((cell, pattern))
    }
}
