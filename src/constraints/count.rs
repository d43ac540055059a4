//! Global bound on how many cells hold a tile set

use crate::{
    algorithm::{
        executor::{Resolution, TilePropagator},
        trackers::{TrackerId, Tristate},
    },
    analysis::model::{TileSet, TileValue},
    constraints::TileConstraint,
    io::error::Result,
};
use tracing::trace;

/// How the tally is compared with the bound
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountComparison {
    /// At least `count` cells
    AtLeast,
    /// At most `count` cells
    AtMost,
    /// Exactly `count` cells
    Exactly,
}

impl CountComparison {
    const fn bounds_above(self) -> bool {
        matches!(self, Self::AtMost | Self::Exactly)
    }

    const fn bounds_below(self) -> bool {
        matches!(self, Self::AtLeast | Self::Exactly)
    }
}

/// Restricts the number of cells whose tile lies in a set
///
/// With `eager` set, initialization commits cells up front (selecting random
/// candidates for [`CountComparison::AtMost`], banning them otherwise) until
/// the bound is tight, which fails earlier at the cost of a less even spread.
#[derive(Clone, Debug)]
pub struct CountConstraint<T> {
    tiles: Vec<T>,
    comparison: CountComparison,
    count: usize,
    eager: bool,
    handles: Option<(TileSet, TrackerId)>,
}

/// Cells classified by one tally pass
struct Tally {
    yes: usize,
    maybe: Vec<usize>,
}

impl<T: TileValue> CountConstraint<T> {
    /// Bound the cells holding any of `tiles`
    pub fn new(tiles: impl IntoIterator<Item = T>, comparison: CountComparison, count: usize) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
            comparison,
            count,
            eager: false,
            handles: None,
        }
    }

    /// Enable or disable eager initialization
    #[must_use]
    pub const fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Tracked tiles
    pub fn tiles(&self) -> &[T] {
        &self.tiles
    }

    /// Comparison against the bound
    pub const fn comparison(&self) -> CountComparison {
        self.comparison
    }

    /// The bound
    pub const fn count(&self) -> usize {
        self.count
    }

    fn tally(propagator: &TilePropagator<T>, tracker: TrackerId) -> Tally {
        let mut tally = Tally {
            yes: 0,
            maybe: Vec::new(),
        };
        for index in propagator.topology().indices() {
            match propagator.selected_tristate(tracker, index) {
                Some(Tristate::Yes) => tally.yes += 1,
                Some(Tristate::Maybe) => tally.maybe.push(index),
                _ => {}
            }
        }
        tally
    }

    fn enforce(&self, propagator: &mut TilePropagator<T>, tile_set: &TileSet, tally: &Tally) {
        let maybe_count = tally.maybe.len();

        if self.comparison.bounds_above() {
            if tally.yes > self.count {
                trace!(yes = tally.yes, bound = self.count, "Count exceeded");
                propagator.set_contradiction();
                return;
            }
            if tally.yes == self.count && maybe_count > 0 {
                for &index in &tally.maybe {
                    if propagator.ban_index(index, tile_set) != Resolution::Undecided {
                        return;
                    }
                }
            }
        }

        if self.comparison.bounds_below() {
            if tally.yes + maybe_count < self.count {
                trace!(
                    reachable = tally.yes + maybe_count,
                    bound = self.count,
                    "Count unreachable"
                );
                propagator.set_contradiction();
                return;
            }
            if tally.yes + maybe_count == self.count && maybe_count > 0 {
                for &index in &tally.maybe {
                    if propagator.select_index(index, tile_set) != Resolution::Undecided {
                        return;
                    }
                }
            }
        }
    }

    fn fill_eagerly(&self, propagator: &mut TilePropagator<T>, tile_set: &TileSet, tracker: TrackerId) {
        while propagator.status() == Resolution::Undecided {
            let tally = Self::tally(propagator, tracker);
            let maybe_count = tally.maybe.len();

            let tight = if self.comparison == CountComparison::AtMost {
                if tally.yes > self.count {
                    propagator.set_contradiction();
                    return;
                }
                tally.yes == self.count
            } else {
                if tally.yes + maybe_count < self.count {
                    propagator.set_contradiction();
                    return;
                }
                tally.yes + maybe_count == self.count
            };

            if tight || maybe_count == 0 {
                self.enforce(propagator, tile_set, &tally);
                return;
            }

            let position = ((propagator.random_double() * maybe_count as f64) as usize)
                .min(maybe_count - 1);
            let Some(&index) = tally.maybe.get(position) else {
                return;
            };
            if self.comparison == CountComparison::AtMost {
                propagator.select_index(index, tile_set);
            } else {
                propagator.ban_index(index, tile_set);
            }
        }
    }
}

impl<T: TileValue> TileConstraint<T> for CountConstraint<T> {
    fn init(&mut self, propagator: &mut TilePropagator<T>) -> Result<()> {
        let tile_set = propagator.create_tile_set(&self.tiles)?;
        let tracker = propagator.create_selected_tracker(&tile_set);
        if self.eager {
            self.fill_eagerly(propagator, &tile_set, tracker);
        }
        self.handles = Some((tile_set, tracker));
        Ok(())
    }

    fn check(&mut self, propagator: &mut TilePropagator<T>) {
        let Some((tile_set, tracker)) = &self.handles else {
            return;
        };
        let tally = Self::tally(propagator, *tracker);
        self.enforce(propagator, tile_set, &tally);
    }
}
