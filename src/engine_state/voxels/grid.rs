//! # Grid Context Module
//!
//! The read-only view of the host grid that the wire engine consumes. Connectivity
//! and edge resolution only ever read through this trait, so they can run on any
//! thread and never mutate the world.

use cgmath::Point3;

use super::block::{block_side::BlockSide, Block};

/// Read-only access to the cells around a wire.
pub trait GridContext {
    /// Returns the cell at `position`.
    ///
    /// # Returns
    /// `None` when the position is outside the loaded area. This is the "unloaded"
    /// sentinel: implementations must not panic for out-of-range positions.
    fn get_block(&self, position: Point3<i32>) -> Option<Block>;

    /// Whether the cell at `position` offers a solid surface on `side` that a wire
    /// could attach to. Unloaded cells offer no surface.
    fn is_solid_side(&self, position: Point3<i32>, _side: BlockSide) -> bool {
        self.get_block(position)
            .map_or(false, |block| block.block_type.is_solid())
    }
}

impl<G: GridContext + ?Sized> GridContext for &G {
    fn get_block(&self, position: Point3<i32>) -> Option<Block> {
        (**self).get_block(position)
    }

    fn is_solid_side(&self, position: Point3<i32>, side: BlockSide) -> bool {
        (**self).is_solid_side(position, side)
    }
}
