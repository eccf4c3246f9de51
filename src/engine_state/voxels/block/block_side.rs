//! # Block Side Module
//!
//! This module defines the six faces of a voxel cell. A wire can attach to each
//! face from the inside, and neighbour lookups step one cell in a face's direction.

use cgmath::{Point3, Vector3};
use num_derive::FromPrimitive;

/// Represents the six possible faces of a voxel cell.
///
/// The discriminants are the face indices used by every bit encoding in the wire
/// engine, so the order must never change.
///
/// The order is: [DOWN, UP, NORTH, SOUTH, WEST, EAST]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The bottom face (facing negative Y)
    DOWN = 0,

    /// The top face (facing positive Y)
    UP = 1,

    /// The north face (facing negative Z)
    NORTH = 2,

    /// The south face (facing positive Z)
    SOUTH = 3,

    /// The west face (facing negative X)
    WEST = 4,

    /// The east face (facing positive X)
    EAST = 5,
}

/// One of the three coordinate axes.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Axis {
    /// West to east.
    X,
    /// Down to up.
    Y,
    /// North to south.
    Z,
}

impl Axis {
    /// Index of this axis in a `[x, y, z]` coordinate triple.
    pub fn component(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl BlockSide {
    /// Returns an array containing all six faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::DOWN,
            BlockSide::UP,
            BlockSide::NORTH,
            BlockSide::SOUTH,
            BlockSide::WEST,
            BlockSide::EAST,
        ]
    }

    /// Looks a face up by its index.
    ///
    /// # Returns
    /// `None` if `index` is not in `0..6`.
    pub fn from_index(index: usize) -> Option<BlockSide> {
        num_traits::FromPrimitive::from_usize(index)
    }

    /// Position of this face in [`BlockSide::all`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The face on the other side of the cell.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::DOWN => BlockSide::UP,
            BlockSide::UP => BlockSide::DOWN,
            BlockSide::NORTH => BlockSide::SOUTH,
            BlockSide::SOUTH => BlockSide::NORTH,
            BlockSide::WEST => BlockSide::EAST,
            BlockSide::EAST => BlockSide::WEST,
        }
    }

    /// Faces are paired by axis: (DOWN, UP) is Y, (NORTH, SOUTH) is Z, (WEST, EAST) is X.
    pub fn axis(self) -> Axis {
        match self.index() / 2 {
            0 => Axis::Y,
            1 => Axis::Z,
            _ => Axis::X,
        }
    }

    /// Whether the face points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        self.index() % 2 == 1
    }

    /// Two faces are orthogonal when they lie on different axes.
    pub fn is_orthogonal_to(self, other: BlockSide) -> bool {
        self.axis() != other.axis()
    }

    /// Unit step from a cell towards the neighbour behind this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::DOWN => Vector3::new(0, -1, 0),
            BlockSide::UP => Vector3::new(0, 1, 0),
            BlockSide::NORTH => Vector3::new(0, 0, -1),
            BlockSide::SOUTH => Vector3::new(0, 0, 1),
            BlockSide::WEST => Vector3::new(-1, 0, 0),
            BlockSide::EAST => Vector3::new(1, 0, 0),
        }
    }

    /// The position of the neighbour behind this face.
    pub fn step(self, position: Point3<i32>) -> Point3<i32> {
        position + self.offset()
    }

    /// The face whose offset matches `delta`, if `delta` is a unit face step.
    pub fn from_offset(delta: Vector3<i32>) -> Option<BlockSide> {
        BlockSide::all()
            .into_iter()
            .find(|side| side.offset() == delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_faces_share_an_axis() {
        for side in BlockSide::all() {
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.axis(), side.opposite().axis());
            assert!(!side.is_orthogonal_to(side.opposite()));
            assert_eq!(side.offset() + side.opposite().offset(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn index_round_trips() {
        for (i, side) in BlockSide::all().into_iter().enumerate() {
            assert_eq!(side.index(), i);
            assert_eq!(BlockSide::from_index(i), Some(side));
        }
        assert_eq!(BlockSide::from_index(6), None);
    }

    #[test]
    fn from_offset_recovers_the_face() {
        let origin = Point3::new(3, -2, 7);
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_offset(side.step(origin) - origin), Some(side));
        }
        assert_eq!(BlockSide::from_offset(Vector3::new(1, 1, 0)), None);
    }
}
