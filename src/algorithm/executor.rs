use crate::{
    algorithm::{
        backtrack::{BacktrackDepth, BacktrackLog},
        propagation::Propagation,
        selection::{
            PickContext, PickHeuristic, RandomDouble, min_entropy_cell, seeded_random,
            weighted_pattern,
        },
        trackers::{SelectedTracker, TrackerId, TrackerSet, Tristate},
        wave::Wave,
    },
    analysis::model::{CompiledModel, TileModel, TileSet, TileValue},
    constraints::TileConstraint,
    io::{
        configuration::DEFAULT_SEED,
        error::{Result, SolverError},
    },
    spatial::topology::{Point, Topology},
};
use ndarray::Array3;
use tracing::{debug, info, trace};

/// Overall state of a solve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Some cell still has several possibilities
    Undecided,
    /// Every cell has exactly one possibility
    Decided,
    /// No consistent assignment is reachable from here
    Contradiction,
}

/// Whether contradictions rewind earlier decisions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BacktrackType {
    /// Only a positive or negative backtrack depth enables rewinding
    #[default]
    None,
    /// Rewind on contradiction; a depth of 0 means unlimited
    Backtrack,
}

/// Construction options for [`TilePropagator`]
pub struct TilePropagatorOptions<T> {
    /// Backtracking mode
    pub backtrack_type: BacktrackType,
    /// -1 = unlimited, 0 = disabled (unlimited with [`BacktrackType::Backtrack`]), N = bounded
    pub backtrack_depth: i32,
    /// Global constraints in registration order
    pub constraints: Vec<Box<dyn TileConstraint<T> + Send>>,
    /// Random source; a `StdRng` seeded with `seed` when absent
    pub random_double: Option<RandomDouble>,
    /// Seed for the default random source
    pub seed: u64,
    /// Maximum number of decisions per solve
    pub step_limit: Option<usize>,
}

impl<T> Default for TilePropagatorOptions<T> {
    fn default() -> Self {
        Self {
            backtrack_type: BacktrackType::None,
            backtrack_depth: 0,
            constraints: Vec::new(),
            random_double: None,
            seed: DEFAULT_SEED,
            step_limit: None,
        }
    }
}

/// Who is currently mutating the wave
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    External,
    Init,
    Check,
}

/// Constraint-propagating solver over one topology
///
/// Owns the wave, trackers, backtrack log and constraint list. Constraints get
/// `&mut` access only while their `init`/`check` runs, and every ban or select
/// they issue is propagated to a fixpoint before control returns to them.
pub struct TilePropagator<T> {
    topology: Topology,
    model: CompiledModel<T>,
    wave: Wave,
    propagation: Propagation,
    log: BacktrackLog,
    trackers: TrackerSet,
    constraints: Vec<Box<dyn TileConstraint<T> + Send>>,
    pick_heuristic: Option<Box<dyn PickHeuristic>>,
    random: RandomDouble,
    status: Resolution,
    phase: Phase,
    steps: usize,
    step_limit: Option<usize>,
    backtrack_count: usize,
}

impl<T: TileValue> TilePropagator<T> {
    /// Compile `model` and prepare a fully-possible wave over `topology`
    ///
    /// Initial propagation and every constraint's `init` run before this
    /// returns, so the propagator may already be decided or contradicted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model fails validation
    /// - The model's direction set differs from the topology's
    /// - A constraint's `init` fails
    pub fn new(
        model: &impl TileModel<T>,
        topology: Topology,
        options: TilePropagatorOptions<T>,
    ) -> Result<Self> {
        let compiled = model.compile()?;
        Self::from_compiled(compiled, topology, options)
    }

    /// Build from an already compiled model
    ///
    /// # Errors
    ///
    /// Same conditions as [`TilePropagator::new`]
    pub fn from_compiled(
        model: CompiledModel<T>,
        topology: Topology,
        options: TilePropagatorOptions<T>,
    ) -> Result<Self> {
        model.validate()?;
        if model.adjacency.directions() != topology.directions() {
            return Err(SolverError::DirectionMismatch {
                model: model.adjacency.directions(),
                topology: topology.directions(),
            });
        }

        let depth = BacktrackDepth::resolve(options.backtrack_type, options.backtrack_depth);
        let wave = Wave::new(topology.cell_count(), &model.frequencies);
        let propagation = Propagation::new(topology.cell_count(), model.pattern_count());
        let random = options
            .random_double
            .unwrap_or_else(|| seeded_random(options.seed));

        debug!(
            cells = topology.cell_count(),
            patterns = model.pattern_count(),
            ?depth,
            constraints = options.constraints.len(),
            "Created propagator"
        );

        let mut propagator = Self {
            topology,
            model,
            wave,
            propagation,
            log: BacktrackLog::new(depth),
            trackers: TrackerSet::new(),
            constraints: options.constraints,
            pick_heuristic: None,
            random,
            status: Resolution::Undecided,
            phase: Phase::External,
            steps: 0,
            step_limit: options.step_limit,
            backtrack_count: 0,
        };
        propagator.initialize()?;
        Ok(propagator)
    }

    /// Reset to the fully-possible state and re-run constraint initialization
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint's `init` fails
    pub fn clear(&mut self) -> Result<Resolution> {
        self.wave.reset();
        self.log.clear();
        self.propagation.clear();
        self.trackers.clear();
        self.pick_heuristic = None;
        self.status = Resolution::Undecided;
        self.steps = 0;
        self.backtrack_count = 0;
        self.initialize()?;
        Ok(self.status)
    }

    fn initialize(&mut self) -> Result<()> {
        self.propagation.enqueue_all(self.topology.indices());
        if !self.propagate() {
            debug!("Model has no consistent assignment on this topology");
            return Ok(());
        }

        let mut constraints = std::mem::take(&mut self.constraints);
        self.phase = Phase::Init;
        let mut outcome = Ok(());
        for constraint in &mut constraints {
            outcome = constraint.init(self);
            if outcome.is_err() || self.status == Resolution::Contradiction {
                break;
            }
        }
        self.phase = Phase::External;
        self.constraints = constraints;
        outcome?;

        if self.status == Resolution::Undecided {
            self.settle();
        }
        self.refresh_status();
        Ok(())
    }

    /// Step until the solve ends or the step budget is spent
    pub fn run(&mut self) -> Resolution {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), calling `on_step` after every decision
    pub fn run_with(&mut self, mut on_step: impl FnMut(&Self)) -> Resolution {
        while self.status == Resolution::Undecided {
            if self.step_limit.is_some_and(|limit| self.steps >= limit) {
                debug!(steps = self.steps, "Step budget exhausted");
                break;
            }
            self.step();
            on_step(self);
        }
        info!(
            status = ?self.status,
            steps = self.steps,
            backtracks = self.backtrack_count,
            "Run finished"
        );
        self.status
    }

    /// Take one decision, propagate it and run constraint checks
    ///
    /// On contradiction with backtracking enabled, decisions are undone until
    /// a consistent state is found or no checkpoint remains.
    pub fn step(&mut self) -> Resolution {
        if self.status != Resolution::Undecided {
            return self.status;
        }

        let Some((cell, pattern)) = self.pick() else {
            self.refresh_status();
            return self.status;
        };

        self.steps += 1;
        trace!(cell, pattern, step = self.steps, "Deciding cell");
        self.log.push_checkpoint(cell, pattern);
        self.observe(cell, pattern);
        self.settle();

        while self.status == Resolution::Contradiction {
            if !self.recover() {
                debug!(
                    steps = self.steps,
                    backtracks = self.backtrack_count,
                    "No checkpoint left to recover from"
                );
                break;
            }
        }

        self.refresh_status();
        self.status
    }

    fn pick(&mut self) -> Option<(usize, usize)> {
        let Self {
            pick_heuristic,
            wave,
            topology,
            trackers,
            random,
            ..
        } = self;

        if let Some(heuristic) = pick_heuristic {
            let context = PickContext {
                wave,
                topology,
                trackers,
            };
            if let Some((cell, pattern)) = heuristic.pick(&context, &mut **random)
                && wave.count(cell) > 1
                && wave.get(cell, pattern)
            {
                return Some((cell, pattern));
            }
        }

        let cell = min_entropy_cell(wave, &mut **random)?;
        let pattern = weighted_pattern(wave, cell, None, &mut **random)?;
        Some((cell, pattern))
    }

    fn observe(&mut self, cell: usize, pattern: usize) {
        let others: Vec<usize> = self
            .wave
            .possible_patterns(cell)
            .filter(|&other| other != pattern)
            .collect();
        for other in others {
            self.ban_pattern(cell, other);
        }
    }

    fn ban_pattern(&mut self, cell: usize, pattern: usize) -> bool {
        if !self.wave.remove(cell, pattern) {
            return false;
        }
        self.log.record(cell, pattern);
        self.trackers.on_ban(cell, pattern);
        self.propagation.enqueue(cell);
        if self.wave.count(cell) == 0 {
            self.status = Resolution::Contradiction;
        }
        true
    }

    /// Drain the worklist; returns `false` on contradiction
    fn propagate(&mut self) -> bool {
        if self.status == Resolution::Contradiction {
            self.propagation.clear();
            return false;
        }

        let Self {
            wave,
            topology,
            model,
            propagation,
            log,
            trackers,
            ..
        } = self;
        let failed = propagation.run(wave, topology, &model.adjacency, |cell, pattern| {
            log.record(cell, pattern);
            trackers.on_ban(cell, pattern);
        });

        if let Some(cell) = failed {
            trace!(cell, "Propagation emptied cell");
            self.status = Resolution::Contradiction;
            return false;
        }
        true
    }

    /// Propagate and run constraint checks until nothing changes
    fn settle(&mut self) {
        loop {
            if !self.propagate() {
                return;
            }
            let before = self.log.len();
            self.check_constraints();
            if self.status == Resolution::Contradiction {
                return;
            }
            if self.log.len() == before && self.propagation.is_idle() {
                return;
            }
        }
    }

    fn check_constraints(&mut self) {
        if self.constraints.is_empty() {
            return;
        }
        let mut constraints = std::mem::take(&mut self.constraints);
        let previous = self.phase;
        self.phase = Phase::Check;
        for constraint in &mut constraints {
            constraint.check(self);
            if !self.propagate() {
                break;
            }
        }
        self.phase = previous;
        self.constraints = constraints;
    }

    /// Undo the latest decision and exclude it
    ///
    /// Returns `false` when there is nothing left to undo.
    fn recover(&mut self) -> bool {
        let Some(checkpoint) = self.log.pop_checkpoint() else {
            return false;
        };
        self.backtrack_count += 1;
        debug!(
            cell = checkpoint.cell,
            pattern = checkpoint.pattern,
            remaining = self.log.checkpoint_count(),
            "Backtracking"
        );

        self.undo_to(checkpoint.trail_len);
        self.propagation.clear();
        self.status = Resolution::Undecided;

        // Recorded under the previous checkpoint, so a deeper rewind undoes it too
        self.ban_pattern(checkpoint.cell, checkpoint.pattern);
        self.settle();
        true
    }

    fn undo_to(&mut self, trail_len: usize) {
        let Self {
            log, wave, trackers, ..
        } = self;
        for record in log.rewind(trail_len) {
            if wave.restore(record.cell, record.pattern) {
                trackers.on_restore(record.cell, record.pattern);
            }
        }
    }

    fn refresh_status(&mut self) {
        if self.status == Resolution::Undecided && self.wave.is_decided() {
            self.status = Resolution::Decided;
        } else if self.status == Resolution::Undecided && self.wave.has_contradiction() {
            self.status = Resolution::Contradiction;
        }
    }

    /// Apply a change requested through the public API
    fn finish_mutation(&mut self, changed: bool) -> Resolution {
        if !changed {
            return self.status;
        }
        match self.phase {
            Phase::External => {
                self.settle();
                if self.status == Resolution::Contradiction {
                    debug!("External change led to a contradiction");
                }
                self.refresh_status();
            }
            Phase::Init | Phase::Check => {
                self.propagate();
            }
        }
        self.status
    }

    /// Remove every pattern of `tiles` from the cell at `index`
    ///
    /// A no-op when nothing changes or the solve has already ended.
    pub fn ban_index(&mut self, index: usize, tiles: &TileSet) -> Resolution {
        if self.status != Resolution::Undecided || index >= self.topology.cell_count() {
            return self.status;
        }
        let doomed: Vec<usize> = self
            .wave
            .possible_patterns(index)
            .filter(|&pattern| tiles.contains(pattern))
            .collect();
        let mut changed = false;
        for pattern in doomed {
            changed |= self.ban_pattern(index, pattern);
        }
        self.finish_mutation(changed)
    }

    /// Remove every pattern not in `tiles` from the cell at `index`
    ///
    /// A no-op when nothing changes or the solve has already ended.
    pub fn select_index(&mut self, index: usize, tiles: &TileSet) -> Resolution {
        if self.status != Resolution::Undecided || index >= self.topology.cell_count() {
            return self.status;
        }
        let doomed: Vec<usize> = self
            .wave
            .possible_patterns(index)
            .filter(|&pattern| !tiles.contains(pattern))
            .collect();
        let mut changed = false;
        for pattern in doomed {
            changed |= self.ban_pattern(index, pattern);
        }
        self.finish_mutation(changed)
    }

    /// Ban a tile set at a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the topology
    pub fn ban_tiles(&mut self, point: Point, tiles: &TileSet) -> Result<Resolution> {
        let index = self.topology.checked_index(point)?;
        Ok(self.ban_index(index, tiles))
    }

    /// Select a tile set at a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the topology
    pub fn select_tiles(&mut self, point: Point, tiles: &TileSet) -> Result<Resolution> {
        let index = self.topology.checked_index(point)?;
        Ok(self.select_index(index, tiles))
    }

    /// Ban a single tile at a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the topology or the tile is unknown
    pub fn ban(&mut self, point: Point, tile: &T) -> Result<Resolution> {
        let tiles = self.create_tile_set([tile])?;
        self.ban_tiles(point, &tiles)
    }

    /// Select a single tile at a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the topology or the tile is unknown
    pub fn select(&mut self, point: Point, tile: &T) -> Result<Resolution> {
        let tiles = self.create_tile_set([tile])?;
        self.select_tiles(point, &tiles)
    }

    /// Force the solve into contradiction
    pub fn set_contradiction(&mut self) {
        if self.status != Resolution::Contradiction {
            debug!(phase = ?self.phase, "Contradiction forced");
        }
        self.status = Resolution::Contradiction;
        self.propagation.clear();
    }

    /// Resolve tiles to a pattern-level handle
    ///
    /// # Errors
    ///
    /// Returns an error if any tile is not part of the model
    pub fn create_tile_set<'a>(&self, tiles: impl IntoIterator<Item = &'a T>) -> Result<TileSet>
    where
        T: 'a,
    {
        self.model.mapping.tile_set(tiles)
    }

    /// Register a tracker for `tiles`, initialized from the current wave
    pub fn create_selected_tracker(&mut self, tiles: &TileSet) -> TrackerId {
        let tracker = SelectedTracker::new(tiles.patterns().clone(), &self.wave);
        self.trackers.add(tracker)
    }

    /// Tristate of a registered tracker at `index`
    ///
    /// `None` if `tracker` was not created by this propagator.
    pub fn selected_tristate(&self, tracker: TrackerId, index: usize) -> Option<Tristate> {
        self.trackers
            .get(tracker)
            .map(|tracker| tracker.tristate(index, &self.wave))
    }

    /// Tristate of `tiles` at `index`, computed directly from the wave
    pub fn tristate_index(&self, index: usize, tiles: &TileSet) -> Tristate {
        let members = self
            .wave
            .possible_patterns(index)
            .filter(|&pattern| tiles.contains(pattern))
            .count();
        Tristate::from_counts(members, self.wave.count(index))
    }

    /// Tristate of `tiles` at a coordinate
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the topology
    pub fn get_selected_tristate(&self, point: Point, tiles: &TileSet) -> Result<Tristate> {
        let index = self.topology.checked_index(point)?;
        Ok(self.tristate_index(index, tiles))
    }

    /// Install a custom decision rule
    ///
    /// Only the first registration is kept; later ones are rejected and
    /// `false` is returned.
    pub fn set_pick_heuristic(&mut self, heuristic: Box<dyn PickHeuristic>) -> bool {
        if self.pick_heuristic.is_some() {
            debug!("Pick heuristic already registered, ignoring another");
            return false;
        }
        self.pick_heuristic = Some(heuristic);
        true
    }

    /// Draw from the solver's random source
    pub fn random_double(&mut self) -> f64 {
        (self.random)()
    }

    /// Tile of each cell, `None` where the cell does not resolve to one tile
    ///
    /// Indexed `[z, y, x]`.
    pub fn to_value_array(&self) -> Array3<Option<T>> {
        let (width, height, depth) = self.dimensions();
        Array3::from_shape_fn((depth, height, width), |(z, y, x)| {
            let index = self.topology.get_index(Point::new_3d(x, y, z));
            self.cell_value(index)
        })
    }

    /// Every tile still possible in each cell, indexed `[z, y, x]`
    pub fn to_possible_values(&self) -> Array3<Vec<T>> {
        let (width, height, depth) = self.dimensions();
        Array3::from_shape_fn((depth, height, width), |(z, y, x)| {
            let index = self.topology.get_index(Point::new_3d(x, y, z));
            self.cell_values(index)
        })
    }

    /// Pattern of each decided cell, in index order
    pub fn decided_patterns(&self) -> Vec<Option<usize>> {
        self.topology
            .indices()
            .map(|index| self.wave.decided_pattern(index))
            .collect()
    }

    fn cell_values(&self, index: usize) -> Vec<T> {
        let mut values: Vec<T> = Vec::new();
        for pattern in self.wave.possible_patterns(index) {
            if let Some(tile) = self.model.mapping.tile_of(pattern)
                && !values.contains(tile)
            {
                values.push(tile.clone());
            }
        }
        values
    }

    fn cell_value(&self, index: usize) -> Option<T> {
        let mut values = self.cell_values(index);
        if values.len() == 1 { values.pop() } else { None }
    }

    const fn dimensions(&self) -> (usize, usize, usize) {
        (
            self.topology.width(),
            self.topology.height(),
            self.topology.depth(),
        )
    }

    /// Current status
    pub const fn status(&self) -> Resolution {
        self.status
    }

    /// Grid geometry
    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Possibility state
    pub const fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Compiled model
    pub const fn model(&self) -> &CompiledModel<T> {
        &self.model
    }

    /// Trail and checkpoints
    pub const fn backtrack_log(&self) -> &BacktrackLog {
        &self.log
    }

    /// Frequency weight of each pattern
    pub fn frequencies(&self) -> &[f64] {
        &self.model.frequencies
    }

    /// Number of decisions taken since the last reset
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Number of rollbacks since the last reset
    pub const fn backtrack_count(&self) -> usize {
        self.backtrack_count
    }
}
