//! Error types for solver configuration and file operations
//!
//! Contradictions are not errors: they are reported through
//! [`Resolution`](crate::algorithm::executor::Resolution). Everything in here is
//! a programming or configuration mistake that is surfaced immediately.

use crate::algorithm::executor::Resolution;
use crate::spatial::directions::{Direction, DirectionSet};
use crate::spatial::topology::Point;
use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all solver operations
#[derive(Debug)]
pub enum SolverError {
    /// Failed to load a sample image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Sample data doesn't meet model requirements
    InvalidSourceData {
        /// Description of what's wrong with the sample
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Compiled model is unusable
    InvalidModel {
        /// Description of the defect
        reason: String,
    },

    /// Compatibility table is not symmetric
    ///
    /// `pattern` allows `neighbor` along `direction`, but `neighbor` does not
    /// allow `pattern` along the inverse direction.
    AsymmetricAdjacency {
        /// Pattern whose rule has no inverse
        pattern: usize,
        /// Direction of the one-sided rule
        direction: Direction,
        /// Neighbouring pattern
        neighbor: usize,
    },

    /// Model and topology disagree on the neighbourhood shape
    DirectionMismatch {
        /// Direction set the model was built for
        model: DirectionSet,
        /// Direction set of the topology
        topology: DirectionSet,
    },

    /// Tile is not part of the model
    UnknownTile {
        /// Debug rendering of the tile
        tile: String,
    },

    /// Coordinate lies outside the topology
    CoordinateOutOfRange {
        /// Offending coordinate
        point: Point,
        /// Topology extent (width, height, depth)
        dimensions: (usize, usize, usize),
    },

    /// Solve finished without deciding every cell
    Unsolved {
        /// Sample the output was generated from
        path: PathBuf,
        /// Terminal status of the solve
        status: Resolution,
        /// Number of decisions taken
        steps: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidModel { reason } => write!(f, "Invalid model: {reason}"),
            Self::AsymmetricAdjacency {
                pattern,
                direction,
                neighbor,
            } => {
                write!(
                    f,
                    "Pattern {pattern} allows {neighbor} along {direction:?} but the inverse rule is missing"
                )
            }
            Self::DirectionMismatch { model, topology } => {
                write!(
                    f,
                    "Model uses {model:?} directions but topology uses {topology:?}"
                )
            }
            Self::UnknownTile { tile } => write!(f, "Tile {tile} is not part of the model"),
            Self::CoordinateOutOfRange { point, dimensions } => {
                write!(
                    f,
                    "Coordinate ({}, {}, {}) is outside the {}x{}x{} topology",
                    point.x, point.y, point.z, dimensions.0, dimensions.1, dimensions.2
                )
            }
            Self::Unsolved {
                path,
                status,
                steps,
            } => {
                write!(
                    f,
                    "Solving '{}' ended {status:?} after {steps} steps",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, SolverError>;

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SolverError {
    SolverError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid model error
pub fn invalid_model(reason: &impl ToString) -> SolverError {
    SolverError::InvalidModel {
        reason: reason.to_string(),
    }
}

/// Create an unknown tile error from any debuggable tile value
pub fn unknown_tile(tile: &impl fmt::Debug) -> SolverError {
    SolverError::UnknownTile {
        tile: format!("{tile:?}"),
    }
}

/// Create an error for a path the command line cannot use
pub fn invalid_path(path: &Path, reason: &str) -> SolverError {
    SolverError::InvalidParameter {
        parameter: "path",
        value: path.display().to_string(),
        reason: reason.to_string(),
    }
}
