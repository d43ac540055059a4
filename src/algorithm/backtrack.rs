//! Trail of pattern removals and the decision checkpoints into it
//!
//! Every removal the solver applies is appended to the trail. A checkpoint
//! remembers the trail length just before a decision, so undoing a decision is
//! a matter of restoring everything recorded after that point, newest first.

use crate::algorithm::executor::BacktrackType;
use std::collections::VecDeque;

/// How far the solver may rewind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BacktrackDepth {
    /// Contradictions are terminal
    Disabled,
    /// Every decision can be undone
    Unlimited,
    /// Only the N most recent decisions can be undone
    Bounded(usize),
}

impl BacktrackDepth {
    /// Interpret the option pair used by the solver configuration
    ///
    /// A negative depth means unlimited; zero disables backtracking unless
    /// `kind` asks for it, in which case it is unlimited; a positive depth
    /// bounds the number of retained checkpoints.
    pub const fn resolve(kind: BacktrackType, depth: i32) -> Self {
        match (kind, depth) {
            (_, depth) if depth < 0 => Self::Unlimited,
            (BacktrackType::Backtrack, 0) => Self::Unlimited,
            (BacktrackType::None, 0) => Self::Disabled,
            (_, depth) => Self::Bounded(depth as usize),
        }
    }

    /// Whether any rewinding is possible
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// One pattern removed from one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BanRecord {
    /// Cell index
    pub cell: usize,
    /// Removed pattern
    pub pattern: usize,
}

/// State just before a decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Trail length when the decision was taken
    pub trail_len: usize,
    /// Decided cell
    pub cell: usize,
    /// Pattern selected there
    pub pattern: usize,
}

/// Trail plus checkpoints
#[derive(Clone, Debug)]
pub struct BacktrackLog {
    depth: BacktrackDepth,
    trail: Vec<BanRecord>,
    checkpoints: VecDeque<Checkpoint>,
}

impl BacktrackLog {
    /// Create an empty log
    pub fn new(depth: BacktrackDepth) -> Self {
        Self {
            depth,
            trail: Vec::new(),
            checkpoints: VecDeque::new(),
        }
    }

    /// Configured depth
    pub const fn depth(&self) -> BacktrackDepth {
        self.depth
    }

    /// Append a removal
    pub fn record(&mut self, cell: usize, pattern: usize) {
        self.trail.push(BanRecord { cell, pattern });
    }

    /// Remember the current trail position before deciding `pattern` at `cell`
    ///
    /// Does nothing when backtracking is disabled. With a bounded depth the
    /// oldest checkpoint is dropped once the bound is exceeded.
    pub fn push_checkpoint(&mut self, cell: usize, pattern: usize) {
        match self.depth {
            BacktrackDepth::Disabled | BacktrackDepth::Bounded(0) => return,
            BacktrackDepth::Bounded(limit) if self.checkpoints.len() >= limit => {
                self.checkpoints.pop_front();
            }
            BacktrackDepth::Bounded(_) | BacktrackDepth::Unlimited => {}
        }
        self.checkpoints.push_back(Checkpoint {
            trail_len: self.trail.len(),
            cell,
            pattern,
        });
    }

    /// Take the most recent checkpoint
    pub fn pop_checkpoint(&mut self) -> Option<Checkpoint> {
        self.checkpoints.pop_back()
    }

    /// Remove and return every record after `len`, newest first
    pub fn rewind(&mut self, len: usize) -> impl Iterator<Item = BanRecord> + '_ {
        let start = len.min(self.trail.len());
        self.trail.drain(start..).rev()
    }

    /// Every removal since the wave was last full, oldest first
    pub fn records(&self) -> &[BanRecord] {
        &self.trail
    }

    /// Trail length
    pub fn len(&self) -> usize {
        self.trail.len()
    }

    /// Test whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    /// Number of decisions that can still be undone
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.trail.clear();
        self.checkpoints.clear();
    }
}
