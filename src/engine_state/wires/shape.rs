//! # Wire Shape Module
//!
//! Geometry for wire cells. A [`WireShape`] is the set of occupied sub-voxels of one
//! cell at 1/16 block resolution, stored as a 4096-bit array. Every primitive wire
//! shape lies on that grid, so the representation is exact:
//!
//! - union is a bitwise OR, which makes it associative, commutative and idempotent
//! - two shapes are equal exactly when they cover the same space
//! - point containment is a single bit lookup
//!
//! Consumers that want boxes (collision, outlines) call [`WireShape::to_boxes`], which
//! greedily merges occupied sub-voxels into disjoint axis-aligned boxes.

use std::fmt;

use bitvec::prelude::{BitArray, Lsb0};
use cgmath::Point3;

use crate::engine_state::config::SHAPE_RESOLUTION;

const RESOLUTION: usize = SHAPE_RESOLUTION as usize;
const PLANE: usize = RESOLUTION * RESOLUTION;
const VOXEL_COUNT: usize = PLANE * RESOLUTION;

type VoxelBits = BitArray<[u64; VOXEL_COUNT / 64], Lsb0>;

/// An axis-aligned box in sub-voxel units. `min` is inclusive and `max` exclusive,
/// both within `0..=16`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeBox {
    /// Inclusive lower corner, in sub-voxels.
    pub min: Point3<u8>,
    /// Exclusive upper corner, in sub-voxels.
    pub max: Point3<u8>,
}

impl ShapeBox {
    /// Builds a box from corner coordinates, clamping to the cell.
    pub fn new(min: [u8; 3], max: [u8; 3]) -> Self {
        let clamp = |v: u8| v.min(SHAPE_RESOLUTION);
        ShapeBox {
            min: Point3::new(clamp(min[0]), clamp(min[1]), clamp(min[2])),
            max: Point3::new(clamp(max[0]), clamp(max[1]), clamp(max[2])),
        }
    }

    /// Whether the box encloses no sub-voxel.
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Number of sub-voxels covered.
    pub fn volume(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.max.x - self.min.x) as usize
            * (self.max.y - self.min.y) as usize
            * (self.max.z - self.min.z) as usize
    }
}

/// The occupied space of one wire cell.
#[derive(Copy, Clone)]
pub struct WireShape {
    voxels: VoxelBits,
}

fn voxel_index(x: usize, y: usize, z: usize) -> usize {
    x + RESOLUTION * y + PLANE * z
}

impl WireShape {
    /// The shape occupying no space.
    pub fn empty() -> Self {
        WireShape {
            voxels: VoxelBits::ZERO,
        }
    }

    /// A shape filling exactly `shape_box`.
    pub fn from_box(shape_box: ShapeBox) -> Self {
        let mut shape = WireShape::empty();
        shape.add_box(shape_box);
        shape
    }

    /// The union of `boxes`.
    pub fn from_boxes(boxes: &[ShapeBox]) -> Self {
        let mut shape = WireShape::empty();
        for shape_box in boxes {
            shape.add_box(*shape_box);
        }
        shape
    }

    fn add_box(&mut self, shape_box: ShapeBox) {
        for z in shape_box.min.z..shape_box.max.z {
            for y in shape_box.min.y..shape_box.max.y {
                for x in shape_box.min.x..shape_box.max.x {
                    self.voxels
                        .set(voxel_index(x as usize, y as usize, z as usize), true);
                }
            }
        }
    }

    /// Adds `other` to this shape in place.
    pub fn union_with(&mut self, other: &WireShape) {
        for (word, other_word) in self
            .voxels
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.voxels.as_raw_slice())
        {
            *word |= *other_word;
        }
    }

    /// Returns the union of both shapes.
    #[must_use]
    pub fn union(&self, other: &WireShape) -> WireShape {
        let mut result = *self;
        result.union_with(other);
        result
    }

    /// Whether no sub-voxel is filled.
    pub fn is_empty(&self) -> bool {
        self.voxels.not_any()
    }

    /// Number of occupied sub-voxels.
    pub fn volume(&self) -> usize {
        self.voxels.count_ones()
    }

    /// Whether `other` lies entirely within this shape.
    pub fn contains_shape(&self, other: &WireShape) -> bool {
        self.voxels
            .as_raw_slice()
            .iter()
            .zip(other.voxels.as_raw_slice())
            .all(|(mine, theirs)| mine & theirs == *theirs)
    }

    /// Whether a point in cell-local block units (each axis in `0.0..1.0`) is inside the shape.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        let to_voxel = |v: f32| {
            let scaled = (v * SHAPE_RESOLUTION as f32).floor();
            if (0.0..RESOLUTION as f32).contains(&scaled) {
                Some(scaled as usize)
            } else {
                None
            }
        };
        match (to_voxel(point.x), to_voxel(point.y), to_voxel(point.z)) {
            (Some(x), Some(y), Some(z)) => self.voxels[voxel_index(x, y, z)],
            _ => false,
        }
    }

    /// Smallest box enclosing the shape, or `None` for the empty shape.
    pub fn bounds(&self) -> Option<ShapeBox> {
        let mut min = [u8::MAX; 3];
        let mut max = [0u8; 3];
        for index in self.voxels.iter_ones() {
            let coords = [index % RESOLUTION, (index / RESOLUTION) % RESOLUTION, index / PLANE];
            for axis in 0..3 {
                min[axis] = min[axis].min(coords[axis] as u8);
                max[axis] = max[axis].max(coords[axis] as u8 + 1);
            }
        }
        if self.is_empty() {
            None
        } else {
            Some(ShapeBox::new(min, max))
        }
    }

    /// Decomposes the shape into disjoint boxes.
    ///
    /// Boxes are grown greedily: first along x, then whole rows along y, then whole
    /// slabs along z. The union of the returned boxes is exactly this shape.
    pub fn to_boxes(&self) -> Vec<ShapeBox> {
        let mut remaining = self.voxels;
        let mut boxes = Vec::new();

        while let Some(start) = remaining.first_one() {
            let (x0, y0, z0) = (start % RESOLUTION, (start / RESOLUTION) % RESOLUTION, start / PLANE);

            let mut x1 = x0 + 1;
            while x1 < RESOLUTION && remaining[voxel_index(x1, y0, z0)] {
                x1 += 1;
            }

            let row_filled = |bits: &VoxelBits, y: usize, z: usize| {
                (x0..x1).all(|x| bits[voxel_index(x, y, z)])
            };

            let mut y1 = y0 + 1;
            while y1 < RESOLUTION && row_filled(&remaining, y1, z0) {
                y1 += 1;
            }

            let mut z1 = z0 + 1;
            while z1 < RESOLUTION && (y0..y1).all(|y| row_filled(&remaining, y, z1)) {
                z1 += 1;
            }

            for z in z0..z1 {
                for y in y0..y1 {
                    for x in x0..x1 {
                        remaining.set(voxel_index(x, y, z), false);
                    }
                }
            }

            boxes.push(ShapeBox::new(
                [x0 as u8, y0 as u8, z0 as u8],
                [x1 as u8, y1 as u8, z1 as u8],
            ));
        }

        boxes
    }
}

impl Default for WireShape {
    fn default() -> Self {
        WireShape::empty()
    }
}

impl PartialEq for WireShape {
    fn eq(&self, other: &Self) -> bool {
        self.voxels.as_raw_slice() == other.voxels.as_raw_slice()
    }
}

impl Eq for WireShape {}

impl fmt::Debug for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireShape")
            .field("volume", &self.volume())
            .field("bounds", &self.bounds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_boxes() -> Vec<ShapeBox> {
        vec![
            ShapeBox::new([7, 0, 7], [9, 2, 9]),
            ShapeBox::new([7, 0, 0], [9, 2, 7]),
            ShapeBox::new([0, 14, 7], [16, 16, 9]),
        ]
    }

    #[test]
    fn union_is_commutative_and_idempotent() {
        let a = WireShape::from_box(ShapeBox::new([0, 0, 0], [4, 4, 4]));
        let b = WireShape::from_box(ShapeBox::new([2, 2, 2], [8, 3, 3]));
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.union(&a), a);
        assert_eq!(a.union(&b).union(&b), a.union(&b));
        assert!(a.union(&b).contains_shape(&a));
    }

    #[test]
    fn overlapping_volume_is_counted_once() {
        let a = WireShape::from_box(ShapeBox::new([0, 0, 0], [4, 4, 4]));
        let b = WireShape::from_box(ShapeBox::new([2, 0, 0], [6, 4, 4]));
        assert_eq!(a.union(&b).volume(), 6 * 4 * 4);
    }

    #[test]
    fn point_containment_uses_block_units() {
        let shape = WireShape::from_box(ShapeBox::new([7, 0, 7], [9, 2, 9]));
        assert!(shape.contains_point(Point3::new(0.5, 0.05, 0.5)));
        assert!(!shape.contains_point(Point3::new(0.5, 0.2, 0.5)));
        assert!(!shape.contains_point(Point3::new(-0.1, 0.05, 0.5)));
        assert!(!shape.contains_point(Point3::new(0.5, 1.0, 0.5)));
    }

    #[test]
    fn boxes_rebuild_the_same_shape() {
        let shape = WireShape::from_boxes(&sample_boxes());
        let boxes = shape.to_boxes();
        assert_eq!(WireShape::from_boxes(&boxes), shape);
        let total: usize = boxes.iter().map(ShapeBox::volume).sum();
        assert_eq!(total, shape.volume());
    }

    #[test]
    fn single_box_decomposes_to_itself() {
        let shape_box = ShapeBox::new([3, 5, 1], [10, 6, 16]);
        assert_eq!(WireShape::from_box(shape_box).to_boxes(), vec![shape_box]);
    }

    #[test]
    fn bounds_enclose_every_box() {
        let shape = WireShape::from_boxes(&sample_boxes());
        assert_eq!(shape.bounds(), Some(ShapeBox::new([0, 0, 0], [16, 16, 9])));
        assert_eq!(WireShape::empty().bounds(), None);
    }
}
