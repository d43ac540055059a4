//! Worklist arc-consistency over the wave
//!
//! When a cell loses patterns, each neighbour keeps only the patterns that are
//! supported by at least one remaining pattern of the cell. The worklist is
//! FIFO and never holds a cell twice.

use crate::{
    algorithm::{bitset::PatternSet, wave::Wave},
    analysis::model::AdjacencyTable,
    spatial::topology::Topology,
};
use bitvec::prelude::*;
use std::collections::VecDeque;

/// Pending work for the propagation fixpoint
#[derive(Clone, Debug)]
pub struct Propagation {
    queue: VecDeque<usize>,
    queued: BitVec,
    support: PatternSet,
    removals: Vec<usize>,
}

impl Propagation {
    /// Create an empty worklist
    pub fn new(cell_count: usize, pattern_count: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(cell_count),
            queued: bitvec![0; cell_count],
            support: PatternSet::new(pattern_count),
            removals: Vec::with_capacity(pattern_count),
        }
    }

    /// Mark a cell as changed
    pub fn enqueue(&mut self, cell: usize) {
        if self.queued.get(cell).as_deref() == Some(&false) {
            self.queued.set(cell, true);
            self.queue.push_back(cell);
        }
    }

    /// Mark every cell in `cells` as changed
    pub fn enqueue_all(&mut self, cells: impl IntoIterator<Item = usize>) {
        for cell in cells {
            self.enqueue(cell);
        }
    }

    /// Drop all pending work
    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued.fill(false);
    }

    /// Test whether the worklist is empty
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of cells waiting
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain the worklist to a fixpoint
    ///
    /// `on_ban` is called for every pattern removed. Returns the first cell left
    /// with no possibilities, in which case the remaining work is discarded.
    pub fn run(
        &mut self,
        wave: &mut Wave,
        topology: &Topology,
        adjacency: &AdjacencyTable,
        mut on_ban: impl FnMut(usize, usize),
    ) -> Option<usize> {
        let directions = topology.directions().directions();

        while let Some(cell) = self.queue.pop_front() {
            self.queued.set(cell, false);

            for (direction_index, &direction) in directions.iter().enumerate() {
                let Some(neighbor) = topology.try_move_index(cell, direction) else {
                    continue;
                };

                self.support.clear();
                for pattern in wave.possible_patterns(cell) {
                    if let Some(allowed) = adjacency.allowed(pattern, direction_index) {
                        self.support.union_with(allowed);
                    }
                }

                self.removals.clear();
                self.removals.extend(
                    wave.possible_patterns(neighbor)
                        .filter(|&pattern| !self.support.contains(pattern)),
                );
                if self.removals.is_empty() {
                    continue;
                }

                for &pattern in &self.removals {
                    if wave.remove(neighbor, pattern) {
                        on_ban(neighbor, pattern);
                    }
                }

                if wave.count(neighbor) == 0 {
                    self.clear();
                    return Some(neighbor);
                }
                self.enqueue(neighbor);
            }
        }

        None
    }
}
