//! # Shape Composer
//!
//! Turns an [`ExpandedShapeIndex`] into a [`WireShape`] by unioning primitives.
//!
//! The 64 primary shapes are built once when the composer is created. Each is the
//! union of the node shapes of its attached faces, plus an elbow wherever two
//! attached faces are orthogonal: the line on each face reaching towards the other.
//! A full composition starts from the primary shape and adds one line per secondary
//! flag and one edge segment per edge flag.

use log::debug;

use crate::engine_state::error::WireError;
use crate::engine_state::voxels::block::block_side::BlockSide;

use super::encoding::{
    compressed_secondary, AttachmentMask, ExpandedShapeIndex, EDGE_COUNT, PRIMARY_SHAPE_COUNT,
    SUB_SIDE_COUNT,
};
use super::primitives::PrimitiveShapeTables;
use super::shape::WireShape;

/// Composes wire shapes for one wire family.
#[derive(Clone, Debug)]
pub struct ShapeComposer {
    tables: PrimitiveShapeTables,
    primary_shapes: Vec<WireShape>,
}

impl ShapeComposer {
    /// Builds a composer and precomputes its 64 primary shapes.
    pub fn new(tables: PrimitiveShapeTables) -> Self {
        let primary_shapes = (0..PRIMARY_SHAPE_COUNT)
            .map(|index| Self::build_primary(&tables, AttachmentMask::from_index(index as u8)))
            .collect();
        ShapeComposer {
            tables,
            primary_shapes,
        }
    }

    fn build_primary(tables: &PrimitiveShapeTables, mask: AttachmentMask) -> WireShape {
        let mut shape = WireShape::empty();
        for side in mask.sides() {
            shape.union_with(tables.node(side));
            for other in mask.sides().filter(|other| side.is_orthogonal_to(*other)) {
                if let Some(sub_side) = compressed_secondary(side, other) {
                    shape.union_with(tables.line(side, sub_side));
                }
            }
        }
        shape
    }

    /// The primitives this composer unions.
    pub fn tables(&self) -> &PrimitiveShapeTables {
        &self.tables
    }

    /// The precomputed shape for an attachment mask alone.
    pub fn primary_shape(&self, mask: AttachmentMask) -> &WireShape {
        &self.primary_shapes[mask.primary_index() as usize]
    }

    /// Composes the full shape for `index`.
    ///
    /// Secondary flags on unattached faces must never be set; this is checked in
    /// debug builds.
    ///
    /// # Errors
    /// `WireError::EmptyComposition` if a non-zero index yields no geometry, which
    /// only happens with corrupted primitive tables.
    pub fn compose(&self, index: ExpandedShapeIndex) -> Result<WireShape, WireError> {
        debug_assert!(index.is_well_formed(), "malformed shape index {:?}", index);

        let mut shape = *self.primary_shape(index.primary_mask());

        for side in BlockSide::all() {
            for sub_side in 0..SUB_SIDE_COUNT {
                if index.has_secondary(side, sub_side) {
                    shape.union_with(self.tables.line(side, sub_side));
                }
            }
        }

        for edge_index in 0..EDGE_COUNT {
            if index.has_edge(edge_index) {
                shape.union_with(self.tables.edge(edge_index));
            }
        }

        if shape.is_empty() && index.bits() != 0 {
            return Err(WireError::EmptyComposition {
                index: index.bits(),
            });
        }

        debug!("Composed {:?} ({} sub-voxels)", index, shape.volume());
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::WireGeometry;
    use crate::engine_state::wires::edge::Edge;
    use proptest::prelude::*;

    fn composer() -> ShapeComposer {
        ShapeComposer::new(PrimitiveShapeTables::from_geometry(WireGeometry::default()).unwrap())
    }

    /// Every primitive the index selects, in a fixed order.
    fn primitives_for(composer: &ShapeComposer, index: ExpandedShapeIndex) -> Vec<WireShape> {
        let tables = composer.tables();
        let mask = index.primary_mask();
        let mut parts = Vec::new();
        for side in mask.sides() {
            parts.push(*tables.node(side));
            for other in mask.sides().filter(|other| side.is_orthogonal_to(*other)) {
                parts.push(*tables.line(side, compressed_secondary(side, other).unwrap()));
            }
            for sub_side in 0..SUB_SIDE_COUNT {
                if index.has_secondary(side, sub_side) {
                    parts.push(*tables.line(side, sub_side));
                }
            }
        }
        for edge_index in 0..EDGE_COUNT {
            if index.has_edge(edge_index) {
                parts.push(*tables.edge(edge_index));
            }
        }
        parts
    }

    fn well_formed_index() -> impl Strategy<Value = ExpandedShapeIndex> {
        (0u8..64, any::<u32>(), 0u16..0x1000).prop_map(|(primary, secondary, edges)| {
            let mask = AttachmentMask::from_index(primary);
            let mut index = ExpandedShapeIndex::from_primary(mask).with_edge_flags(edges);
            for side in mask.sides() {
                for sub_side in 0..SUB_SIDE_COUNT {
                    if secondary & (1 << (side.index() * SUB_SIDE_COUNT + sub_side)) != 0 {
                        index = index.with_secondary(side, sub_side);
                    }
                }
            }
            index
        })
    }

    #[test]
    fn composition_is_deterministic() {
        let composer = composer();
        let index = ExpandedShapeIndex::from_primary(AttachmentMask::from_sides(&[
            BlockSide::DOWN,
            BlockSide::EAST,
        ]))
        .with_secondary(BlockSide::DOWN, 0)
        .with_edge(Edge::UP_WEST.index());
        assert_eq!(composer.compose(index).unwrap(), composer.compose(index).unwrap());
        assert_eq!(composer.compose(index).unwrap(), self::composer().compose(index).unwrap());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "malformed shape index")]
    fn secondary_flag_on_a_detached_face_is_rejected() {
        let index = ExpandedShapeIndex::from_primary(AttachmentMask::from_sides(&[BlockSide::DOWN]))
            .with_secondary(BlockSide::UP, 0);
        let _ = composer().compose(index);
    }

    #[test]
    fn empty_index_composes_to_the_empty_shape() {
        let shape = composer().compose(ExpandedShapeIndex::default()).unwrap();
        assert!(shape.is_empty());
    }

    #[test]
    fn single_south_face_is_its_node() {
        let composer = composer();
        let index = ExpandedShapeIndex::from_primary(AttachmentMask::from_sides(&[BlockSide::SOUTH]));
        assert_eq!(
            composer.compose(index).unwrap(),
            *composer.tables().node(BlockSide::SOUTH)
        );
    }

    #[test]
    fn opposite_faces_have_no_elbows() {
        let composer = composer();
        let tables = composer.tables();
        let index = ExpandedShapeIndex::from_primary(AttachmentMask::from_sides(&[
            BlockSide::NORTH,
            BlockSide::SOUTH,
        ]));
        let expected = tables.node(BlockSide::NORTH).union(tables.node(BlockSide::SOUTH));
        assert_eq!(composer.compose(index).unwrap(), expected);
    }

    #[test]
    fn orthogonal_faces_include_the_elbow() {
        let composer = composer();
        let tables = composer.tables();
        let mask = AttachmentMask::from_sides(&[BlockSide::NORTH, BlockSide::UP]);
        let north_to_up = compressed_secondary(BlockSide::NORTH, BlockSide::UP).unwrap();
        let up_to_north = compressed_secondary(BlockSide::UP, BlockSide::NORTH).unwrap();
        let west = compressed_secondary(BlockSide::NORTH, BlockSide::WEST).unwrap();

        let index = ExpandedShapeIndex::from_primary(mask).with_secondary(BlockSide::NORTH, west);
        let shape = composer.compose(index).unwrap();

        assert!(shape.contains_shape(tables.node(BlockSide::NORTH)));
        assert!(shape.contains_shape(tables.node(BlockSide::UP)));
        assert!(shape.contains_shape(tables.line(BlockSide::NORTH, north_to_up)));
        assert!(shape.contains_shape(tables.line(BlockSide::UP, up_to_north)));
        assert!(shape.contains_shape(tables.line(BlockSide::NORTH, west)));
        assert!(!composer.primary_shape(mask).contains_shape(tables.line(BlockSide::NORTH, west)));
    }

    #[test]
    fn everything_set_matches_a_naive_union() {
        let composer = composer();
        let tables = composer.tables();
        let mut index = ExpandedShapeIndex::from_primary(AttachmentMask::ALL).with_edge_flags(0xfff);
        for side in BlockSide::all() {
            for sub_side in 0..SUB_SIDE_COUNT {
                index = index.with_secondary(side, sub_side);
            }
        }
        assert_eq!(index.bits().count_ones(), 42);

        let mut naive = WireShape::empty();
        for side in BlockSide::all() {
            naive.union_with(tables.node(side));
            for sub_side in 0..SUB_SIDE_COUNT {
                naive.union_with(tables.line(side, sub_side));
            }
        }
        for edge_index in 0..EDGE_COUNT {
            naive.union_with(tables.edge(edge_index));
        }

        assert_eq!(composer.compose(index).unwrap(), naive);
    }

    #[test]
    fn every_primary_shape_covers_its_nodes() {
        let composer = composer();
        for index in 0..PRIMARY_SHAPE_COUNT {
            let mask = AttachmentMask::from_index(index as u8);
            let shape = composer.primary_shape(mask);
            assert_eq!(shape.is_empty(), mask.is_empty());
            for side in BlockSide::all() {
                assert_eq!(
                    shape.contains_shape(composer.tables().node(side)),
                    mask.contains(side),
                    "mask {:?}, side {:?}",
                    mask,
                    side
                );
            }
        }
    }

    #[test]
    fn shuffled_unions_agree_with_compose() {
        let composer = composer();
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..32 {
            let mask = AttachmentMask::from_index(rng.u8(1..64));
            let mut index = ExpandedShapeIndex::from_primary(mask).with_edge_flags(rng.u16(0..0x1000));
            for side in mask.sides() {
                index = index.with_secondary(side, rng.usize(0..SUB_SIDE_COUNT));
            }

            let mut parts = primitives_for(&composer, index);
            rng.shuffle(&mut parts);
            let shuffled = parts
                .iter()
                .fold(WireShape::empty(), |acc, part| acc.union(part));
            assert_eq!(shuffled, composer.compose(index).unwrap());
        }
    }

    proptest! {
        #[test]
        fn union_order_does_not_matter(index in well_formed_index(), seed in any::<u64>()) {
            let composer = composer();
            let mut parts = primitives_for(&composer, index);
            fastrand::Rng::with_seed(seed).shuffle(&mut parts);
            let reversed = parts
                .iter()
                .rev()
                .fold(WireShape::empty(), |acc, part| acc.union(part));
            prop_assert_eq!(reversed, composer.compose(index).unwrap());
        }
    }
}
