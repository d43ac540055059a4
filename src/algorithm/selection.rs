use crate::{
    algorithm::{bitset::PatternSet, trackers::TrackerSet, wave::Wave},
    io::configuration::ENTROPY_TIE_EPSILON,
    math::probability::weighted_choice,
    spatial::topology::Topology,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of uniform samples in `[0, 1)`
pub type RandomDouble = Box<dyn FnMut() -> f64 + Send>;

/// Deterministic random source seeded from `seed`
pub fn seeded_random(seed: u64) -> RandomDouble {
    let mut rng = StdRng::seed_from_u64(seed);
    Box::new(move || rng.random::<f64>())
}

/// Undecided cell with the lowest entropy
///
/// Cells whose entropy is within [`ENTROPY_TIE_EPSILON`] of the current minimum
/// are tied; ties are broken uniformly by reservoir sampling so each tied cell
/// is equally likely regardless of scan order. Returns `None` when no cell has
/// more than one possibility.
pub fn min_entropy_cell(wave: &Wave, random: &mut dyn FnMut() -> f64) -> Option<usize> {
    let mut best = f64::INFINITY;
    let mut chosen = None;
    let mut ties = 0_usize;

    for cell in 0..wave.cell_count() {
        if wave.count(cell) <= 1 {
            continue;
        }
        let entropy = wave.entropy(cell);
        if entropy < best - ENTROPY_TIE_EPSILON {
            best = entropy;
            chosen = Some(cell);
            ties = 1;
        } else if (entropy - best).abs() <= ENTROPY_TIE_EPSILON {
            ties += 1;
            if random() * (ties as f64) < 1.0 {
                chosen = Some(cell);
            }
        }
    }

    chosen
}

/// Frequency-weighted choice among the patterns still possible at `cell`
///
/// When `within` is given only its members are candidates.
pub fn weighted_pattern(
    wave: &Wave,
    cell: usize,
    within: Option<&PatternSet>,
    random: &mut dyn FnMut() -> f64,
) -> Option<usize> {
    let candidates: Vec<usize> = wave
        .possible_patterns(cell)
        .filter(|&pattern| within.is_none_or(|set| set.contains(pattern)))
        .collect();
    let weights: Vec<f64> = candidates
        .iter()
        .map(|&pattern| wave.frequencies().get(pattern).copied().unwrap_or(0.0))
        .collect();

    weighted_choice(&weights, random()).and_then(|index| candidates.get(index).copied())
}

/// Read-only solver state handed to pick heuristics
pub struct PickContext<'a> {
    /// Current possibilities
    pub wave: &'a Wave,
    /// Grid geometry
    pub topology: &'a Topology,
    /// Registered trackers
    pub trackers: &'a TrackerSet,
}

/// Replacement for the default minimum-entropy decision
///
/// Returning `None` defers to the default rule for this step.
pub trait PickHeuristic: Send {
    /// Choose a `(cell, pattern)` pair to decide next
    fn pick(
        &mut self,
        context: &PickContext<'_>,
        random: &mut dyn FnMut() -> f64,
    ) -> Option<(usize, usize)>;
}
