//! Incremental tristate views over the wave
//!
//! A [`SelectedTracker`] counts, per cell, how many of the cell's remaining
//! patterns belong to a tracked set. The count only moves when the solver
//! bans or restores a member pattern, so tristate reads are O(1).

use crate::algorithm::{bitset::PatternSet, wave::Wave};

/// Three-valued answer to "is this set selected here"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tristate {
    /// No remaining pattern is a member
    No,
    /// Some remaining patterns are members
    Maybe,
    /// Every remaining pattern is a member
    Yes,
}

impl Tristate {
    /// Classify a cell from its member and total pattern counts
    pub const fn from_counts(members: usize, total: usize) -> Self {
        if members == 0 {
            Self::No
        } else if members == total {
            Self::Yes
        } else {
            Self::Maybe
        }
    }

    /// Definitely absent
    pub const fn is_no(self) -> bool {
        matches!(self, Self::No)
    }

    /// Possibly present
    pub const fn is_maybe(self) -> bool {
        matches!(self, Self::Maybe)
    }

    /// Definitely present
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Per-cell count of remaining patterns that belong to a tracked set
#[derive(Clone, Debug)]
pub struct SelectedTracker {
    patterns: PatternSet,
    member_counts: Vec<usize>,
}

impl SelectedTracker {
    /// Start tracking `patterns` from the current state of `wave`
    pub fn new(patterns: PatternSet, wave: &Wave) -> Self {
        let member_counts = (0..wave.cell_count())
            .map(|cell| {
                wave.possible_patterns(cell)
                    .filter(|&pattern| patterns.contains(pattern))
                    .count()
            })
            .collect();
        Self {
            patterns,
            member_counts,
        }
    }

    /// Tracked patterns
    pub const fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Account for `pattern` leaving `cell`
    pub fn on_ban(&mut self, cell: usize, pattern: usize) {
        if self.patterns.contains(pattern)
            && let Some(count) = self.member_counts.get_mut(cell)
        {
            *count = count.saturating_sub(1);
        }
    }

    /// Account for `pattern` returning to `cell`
    pub fn on_restore(&mut self, cell: usize, pattern: usize) {
        if self.patterns.contains(pattern)
            && let Some(count) = self.member_counts.get_mut(cell)
        {
            *count += 1;
        }
    }

    /// Remaining member patterns at `cell`
    pub fn member_count(&self, cell: usize) -> usize {
        self.member_counts.get(cell).copied().unwrap_or(0)
    }

    /// Tristate of `cell`
    pub fn tristate(&self, cell: usize, wave: &Wave) -> Tristate {
        Tristate::from_counts(self.member_count(cell), wave.count(cell))
    }
}

/// Handle to a tracker owned by the solver
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackerId(usize);

impl TrackerId {
    /// Position in registration order
    pub const fn index(self) -> usize {
        self.0
    }
}

/// All trackers registered with one solver
#[derive(Clone, Debug, Default)]
pub struct TrackerSet {
    trackers: Vec<SelectedTracker>,
}

impl TrackerSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            trackers: Vec::new(),
        }
    }

    /// Register a tracker
    pub fn add(&mut self, tracker: SelectedTracker) -> TrackerId {
        self.trackers.push(tracker);
        TrackerId(self.trackers.len() - 1)
    }

    /// Look up a tracker
    pub fn get(&self, id: TrackerId) -> Option<&SelectedTracker> {
        self.trackers.get(id.0)
    }

    /// Number of registered trackers
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Test whether no tracker is registered
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Notify every tracker of a removal
    pub fn on_ban(&mut self, cell: usize, pattern: usize) {
        for tracker in &mut self.trackers {
            tracker.on_ban(cell, pattern);
        }
    }

    /// Notify every tracker of a restoration
    pub fn on_restore(&mut self, cell: usize, pattern: usize) {
        for tracker in &mut self.trackers {
            tracker.on_restore(cell, pattern);
        }
    }

    /// Drop every tracker
    pub fn clear(&mut self) {
        self.trackers.clear();
    }
}
