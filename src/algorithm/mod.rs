/// Bounded undo trail and decision checkpoints
pub mod backtrack;
/// Pattern index sets
pub mod bitset;
/// Propagator orchestration: decisions, constraints and recovery
pub mod executor;
/// Arc-consistency propagation queue
pub mod propagation;
/// Minimum-entropy cell choice and decision heuristics
pub mod selection;
/// Incremental per-cell membership counters
pub mod trackers;
/// Per-cell pattern possibilities with cached entropy terms
pub mod wave;
