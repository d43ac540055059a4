//! Axis-aligned neighbour directions and the sets they come in

/// One step along a grid axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// +1 along x
    XPlus,
    /// -1 along x
    XMinus,
    /// +1 along y
    YPlus,
    /// -1 along y
    YMinus,
    /// +1 along z
    ZPlus,
    /// -1 along z
    ZMinus,
}

impl Direction {
    /// Per-axis offset `[dx, dy, dz]`
    pub const fn delta(self) -> [i32; 3] {
        match self {
            Self::XPlus => [1, 0, 0],
            Self::XMinus => [-1, 0, 0],
            Self::YPlus => [0, 1, 0],
            Self::YMinus => [0, -1, 0],
            Self::ZPlus => [0, 0, 1],
            Self::ZMinus => [0, 0, -1],
        }
    }

    /// Direction pointing the opposite way
    pub const fn inverse(self) -> Self {
        match self {
            Self::XPlus => Self::XMinus,
            Self::XMinus => Self::XPlus,
            Self::YPlus => Self::YMinus,
            Self::YMinus => Self::YPlus,
            Self::ZPlus => Self::ZMinus,
            Self::ZMinus => Self::ZPlus,
        }
    }
}

const CARTESIAN_2D: [Direction; 4] = [
    Direction::XPlus,
    Direction::XMinus,
    Direction::YPlus,
    Direction::YMinus,
];

const CARTESIAN_3D: [Direction; 6] = [
    Direction::XPlus,
    Direction::XMinus,
    Direction::YPlus,
    Direction::YMinus,
    Direction::ZPlus,
    Direction::ZMinus,
];

/// Ordered set of directions defining a neighbourhood
///
/// A direction's index is its position in [`DirectionSet::directions`]; every
/// compatibility table is laid out by these indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionSet {
    /// Four neighbours in the xy plane
    Cartesian2d,
    /// Six neighbours in xyz space
    Cartesian3d,
}

impl DirectionSet {
    /// All directions in index order
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::Cartesian2d => &CARTESIAN_2D,
            Self::Cartesian3d => &CARTESIAN_3D,
        }
    }

    /// Number of directions
    pub const fn len(self) -> usize {
        self.directions().len()
    }

    /// Always false; kept for API symmetry with `len`
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Index of a direction, if it belongs to this set
    pub fn index_of(self, direction: Direction) -> Option<usize> {
        self.directions().iter().position(|&d| d == direction)
    }

    /// Direction stored at `index`
    pub fn get(self, index: usize) -> Option<Direction> {
        self.directions().get(index).copied()
    }

    /// Index of the direction opposite to the one at `index`
    pub fn inverse_index(self, index: usize) -> Option<usize> {
        self.get(index)
            .and_then(|direction| self.index_of(direction.inverse()))
    }
}
