//! # Wire Maintenance Rules
//!
//! Decisions the host's placement and neighbour-update logic asks of a wire cell:
//! whether its faces still rest on something solid, and when edge-only cells
//! should appear in or vanish from the grid. None of these touch the grid; the
//! caller applies the outcome and then reports the topology change to the region.

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, Block};
use crate::engine_state::voxels::grid::GridContext;

use super::encoding::AttachmentMask;

/// Whether every attached face of `block` rests on a solid neighbour side.
///
/// Neighbours in unloaded cells count as supporting, so wires on a chunk border are
/// not torn down while the far side is loading.
pub fn is_valid_position(block: &Block, grid: &dyn GridContext, position: Point3<i32>) -> bool {
    block.attachments.sides().all(|side| {
        let neighbor = side.step(position);
        grid.get_block(neighbor).is_none() || grid.is_solid_side(neighbor, side.opposite())
    })
}

/// Drops the face towards a changed neighbour if that neighbour no longer offers a
/// solid side.
///
/// # Returns
/// The new mask and whether a face was removed, so the caller can drop an item.
pub fn detach_unsupported(
    mask: AttachmentMask,
    direction_to_neighbor: BlockSide,
    neighbor_solid: bool,
) -> (AttachmentMask, bool) {
    if mask.contains(direction_to_neighbor) && !neighbor_solid {
        (mask.with(direction_to_neighbor, false), true)
    } else {
        (mask, false)
    }
}

/// A wire cell with no faces exists only to carry edge segments.
pub fn should_remove_empty_wire(mask: AttachmentMask, edge_flags: u16) -> bool {
    mask.is_empty() && edge_flags == 0
}

/// Whether the air cell one step from `wire` in `direction_to_neighbor` should
/// host an edge-only cell of the same wire type.
///
/// That is the case when one of the wire's faces, orthogonal to the direction, leads
/// to a diagonal cell holding the same wire type attached to the face that looks
/// back towards `wire`'s column.
pub fn should_place_empty_wire(
    wire: &Block,
    grid: &dyn GridContext,
    air_position: Point3<i32>,
    direction_to_neighbor: BlockSide,
) -> bool {
    if !grid.get_block(air_position).map_or(false, |block| block.is_air()) {
        return false;
    }
    let facing_back = direction_to_neighbor.opposite();
    wire.attachments
        .sides()
        .filter(|side| side.is_orthogonal_to(direction_to_neighbor))
        .any(|side| {
            grid.get_block(side.step(air_position)).map_or(false, |diagonal| {
                diagonal.block_type == wire.block_type && diagonal.attachments.contains(facing_back)
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::world::World;

    fn world() -> World {
        let mut world = World::new();
        world.add_chunk_at(Point3::new(0, 0, 0));
        world
    }

    fn floor_wire() -> Block {
        Block::attached(BlockType::RED_ALLOY_WIRE, AttachmentMask::from_sides(&[BlockSide::DOWN]))
    }

    #[test]
    fn wires_need_solid_ground() {
        let world = world();
        let position = Point3::new(4, 4, 4);
        assert!(!is_valid_position(&floor_wire(), &world, position));

        world.set_block(BlockSide::DOWN.step(position), Block::new(BlockType::STONE)).unwrap();
        assert!(is_valid_position(&floor_wire(), &world, position));

        world.set_block(BlockSide::DOWN.step(position), Block::new(BlockType::GLASS)).unwrap();
        assert!(!is_valid_position(&floor_wire(), &world, position));
    }

    #[test]
    fn unloaded_support_is_assumed() {
        let world = world();
        // y = 0 rests on the unloaded chunk below
        assert!(is_valid_position(&floor_wire(), &world, Point3::new(4, 0, 4)));
    }

    #[test]
    fn only_the_face_towards_the_change_detaches() {
        let mask = AttachmentMask::from_sides(&[BlockSide::DOWN, BlockSide::NORTH]);

        let (kept, detached) = detach_unsupported(mask, BlockSide::DOWN, true);
        assert_eq!((kept, detached), (mask, false));

        let (kept, detached) = detach_unsupported(mask, BlockSide::DOWN, false);
        assert_eq!(kept, AttachmentMask::from_sides(&[BlockSide::NORTH]));
        assert!(detached);

        let (kept, detached) = detach_unsupported(mask, BlockSide::EAST, false);
        assert_eq!((kept, detached), (mask, false));
    }

    #[test]
    fn empty_wire_lives_only_while_it_has_edges() {
        assert!(should_remove_empty_wire(AttachmentMask::EMPTY, 0));
        assert!(!should_remove_empty_wire(AttachmentMask::EMPTY, 1 << 2));
        assert!(!should_remove_empty_wire(AttachmentMask::from_sides(&[BlockSide::UP]), 0));
    }

    #[test]
    fn empty_wire_bridges_an_outside_corner() {
        let world = world();
        let wire_position = Point3::new(4, 4, 4);
        let air = BlockSide::EAST.step(wire_position);
        let diagonal = BlockSide::DOWN.step(air);

        assert!(!should_place_empty_wire(&floor_wire(), &world, air, BlockSide::EAST));

        let wall_wire = Block::attached(
            BlockType::RED_ALLOY_WIRE,
            AttachmentMask::from_sides(&[BlockSide::WEST]),
        );
        world.set_block(diagonal, wall_wire).unwrap();
        assert!(should_place_empty_wire(&floor_wire(), &world, air, BlockSide::EAST));

        world.set_block(air, Block::new(BlockType::STONE)).unwrap();
        assert!(!should_place_empty_wire(&floor_wire(), &world, air, BlockSide::EAST));
    }
}
