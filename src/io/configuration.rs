//! Solver constants and runtime configuration defaults

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Side length of overlapping patterns extracted from samples
pub const DEFAULT_PATTERN_SIZE: usize = 3;

/// Number of dihedral variants added per extracted pattern (1..=8)
pub const DEFAULT_SYMMETRY: usize = 8;

/// Output width and height when none are given
pub const DEFAULT_OUTPUT_SIZE: usize = 48;

/// Backtrack depth used by the command line (-1 = unlimited)
pub const DEFAULT_BACKTRACK_DEPTH: i32 = -1;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed extent of any topology axis
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Entropies closer than this are treated as ties during cell selection
/// Tolerance for entropy comparisons
pub const ENTROPY_TIE_EPSILON: f64 = 1e-9;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
