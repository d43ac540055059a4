//! Grid topology: coordinate and index math over a fixed-size grid
//!
//! Cells are addressed either by [`Point`] or by a dense index in
//! `0..width * height * depth`, laid out x-fastest. Each axis can wrap
//! independently. The topology holds no mutable state and is shared by
//! reference by everything that needs neighbour lookups.

use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, SolverError, invalid_parameter};
use crate::spatial::directions::{Direction, DirectionSet};
use std::ops::Range;

/// Cell coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Layer
    pub z: usize,
}

impl Point {
    /// Point in the z = 0 plane
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y, z: 0 }
    }

    /// Point with an explicit layer
    pub const fn new_3d(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Fixed-size grid with per-axis periodicity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    width: usize,
    height: usize,
    depth: usize,
    periodic: [bool; 3],
    directions: DirectionSet,
}

impl Topology {
    /// Create a 2D topology using the four cartesian directions
    ///
    /// # Errors
    ///
    /// Returns an error if either extent is zero or exceeds the maximum grid dimension
    pub fn new(width: usize, height: usize, periodic: bool) -> Result<Self> {
        Self::build(
            [width, height, 1],
            [periodic, periodic, false],
            DirectionSet::Cartesian2d,
        )
    }

    /// Create a 3D topology using the six cartesian directions
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is zero or exceeds the maximum grid dimension
    pub fn new_3d(width: usize, height: usize, depth: usize, periodic: bool) -> Result<Self> {
        Self::build(
            [width, height, depth],
            [periodic; 3],
            DirectionSet::Cartesian3d,
        )
    }

    /// Replace the periodicity of each axis (x, y, z)
    #[must_use]
    pub const fn with_periodicity(mut self, periodic: [bool; 3]) -> Self {
        self.periodic = periodic;
        self
    }

    fn build(extent: [usize; 3], periodic: [bool; 3], directions: DirectionSet) -> Result<Self> {
        for (&axis, &size) in ["width", "height", "depth"].iter().zip(&extent) {
            if size == 0 || size > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    axis,
                    &size,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }

        let [width, height, depth] = extent;
        Ok(Self {
            width,
            height,
            depth,
            periodic,
            directions,
        })
    }

    /// Extent along x
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Extent along y
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Extent along z
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Periodicity of each axis (x, y, z)
    pub const fn periodicity(&self) -> [bool; 3] {
        self.periodic
    }

    /// Neighbourhood used by this grid
    pub const fn directions(&self) -> DirectionSet {
        self.directions
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// All cell indices
    pub const fn indices(&self) -> Range<usize> {
        0..self.cell_count()
    }

    /// Check if a coordinate lies inside the grid
    pub const fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height && point.z < self.depth
    }

    /// Dense index of a coordinate
    ///
    /// The coordinate must satisfy [`Topology::contains`].
    pub const fn get_index(&self, point: Point) -> usize {
        point.x + point.y * self.width + point.z * self.width * self.height
    }

    /// Coordinate of a dense index
    ///
    /// The index must be below [`Topology::cell_count`].
    pub const fn get_coord(&self, index: usize) -> Point {
        let x = index % self.width;
        let rest = index / self.width;
        Point {
            x,
            y: rest % self.height,
            z: rest / self.height,
        }
    }

    /// Dense index of a coordinate, or an error if it lies outside the grid
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::CoordinateOutOfRange`] for coordinates outside the grid
    pub const fn checked_index(&self, point: Point) -> Result<usize> {
        if self.contains(point) {
            Ok(self.get_index(point))
        } else {
            Err(SolverError::CoordinateOutOfRange {
                point,
                dimensions: (self.width, self.height, self.depth),
            })
        }
    }

    /// Step one cell along `direction`
    ///
    /// Wraps on periodic axes; returns `None` when leaving a non-periodic edge.
    pub fn try_move(&self, point: Point, direction: Direction) -> Option<Point> {
        let [dx, dy, dz] = direction.delta();
        Some(Point {
            x: step_axis(point.x, dx, self.width, self.periodic[0])?,
            y: step_axis(point.y, dy, self.height, self.periodic[1])?,
            z: step_axis(point.z, dz, self.depth, self.periodic[2])?,
        })
    }

    /// Index-based variant of [`Topology::try_move`]
    pub fn try_move_index(&self, index: usize, direction: Direction) -> Option<usize> {
        self.try_move(self.get_coord(index), direction)
            .map(|point| self.get_index(point))
    }
}

fn step_axis(value: usize, delta: i32, extent: usize, periodic: bool) -> Option<usize> {
    if delta == 0 {
        return Some(value);
    }
    let moved = value as i64 + i64::from(delta);
    let extent = extent as i64;
    if periodic {
        Some(moved.rem_euclid(extent) as usize)
    } else if (0..extent).contains(&moved) {
        Some(moved as usize)
    } else {
        None
    }
}
