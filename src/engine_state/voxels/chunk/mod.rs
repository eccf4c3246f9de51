//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a fixed 16x16x16 block of cell state
//! owned by the reference world.
//!
//! ## Storage
//!
//! - `blocks`: dense cell storage in row-major order (x, then y, then z)
//! - `occupied`: a bit vector (1 bit per cell) marking non-air cells
//!
//! The bit vector lets callers walk only the interesting cells of a chunk (wires are
//! sparse) without scanning every `Block`.

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::Block;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 16x16x16 collection of cells in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// One bit per cell, set when the cell is not air.
    pub occupied: BitVec,

    /// Cell state for every position in the chunk.
    pub blocks: Vec<Block>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: &Point3<i32>) -> Self {
        Chunk {
            position: *position,
            occupied: BitVec::repeat(false, CHUNK_SIZE as usize),
            blocks: vec![Block::AIR; CHUNK_SIZE as usize],
        }
    }

    /// Creates a chunk whose lowest `layers` planes are filled with `block`.
    ///
    /// Used to lay down a floor for wires to rest on.
    pub fn floor(position: &Point3<i32>, layers: i32, block: Block) -> Self {
        let mut chunk = Chunk::empty(position);
        for y in 0..layers.clamp(0, CHUNK_DIMENSION) {
            for z in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    chunk.set_block_at(Point3::new(x as usize, y as usize, z as usize), block);
                }
            }
        }
        chunk
    }

    fn local_index(local: Point3<usize>) -> usize {
        local.x + CHUNK_DIMENSION as usize * local.y + CHUNK_PLANE_SIZE as usize * local.z
    }

    fn local_position(index: usize) -> Point3<usize> {
        let dimension = CHUNK_DIMENSION as usize;
        Point3::new(
            index % dimension,
            (index / dimension) % dimension,
            index / (dimension * dimension),
        )
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get_block_at(&self, local: Point3<usize>) -> Block {
        self.blocks[Self::local_index(local)]
    }

    /// Replaces the block at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// The block that was previously stored there.
    pub fn set_block_at(&mut self, local: Point3<usize>, block: Block) -> Block {
        let index = Self::local_index(local);
        self.occupied.set(index, !block.is_air());
        std::mem::replace(&mut self.blocks[index], block)
    }

    /// Number of non-air cells in the chunk.
    pub fn occupied_count(&self) -> usize {
        self.occupied.count_ones()
    }

    /// Iterates over every non-air cell with its chunk-relative position.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (Point3<usize>, Block)> + '_ {
        self.occupied
            .iter_ones()
            .map(|index| (Self::local_position(index), self.blocks[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn set_block_tracks_occupancy() {
        let mut chunk = Chunk::empty(&Point3::new(0, 0, 0));
        let local = Point3::new(3, 4, 5);
        let previous = chunk.set_block_at(local, Block::new(BlockType::STONE));
        assert_eq!(previous, Block::AIR);
        assert_eq!(chunk.occupied_count(), 1);
        assert_eq!(chunk.get_block_at(local).block_type, BlockType::STONE);

        chunk.set_block_at(local, Block::AIR);
        assert_eq!(chunk.occupied_count(), 0);
    }

    #[test]
    fn iteration_reports_local_positions() {
        let mut chunk = Chunk::empty(&Point3::new(1, 0, -1));
        chunk.set_block_at(Point3::new(15, 0, 0), Block::new(BlockType::DIRT));
        chunk.set_block_at(Point3::new(0, 15, 15), Block::new(BlockType::STONE));
        let cells: Vec<_> = chunk.iter_occupied().collect();
        assert_eq!(
            cells,
            vec![
                (Point3::new(15, 0, 0), Block::new(BlockType::DIRT)),
                (Point3::new(0, 15, 15), Block::new(BlockType::STONE)),
            ]
        );
    }

    #[test]
    fn floor_fills_lowest_planes() {
        let chunk = Chunk::floor(&Point3::new(0, 0, 0), 2, Block::new(BlockType::STONE));
        assert_eq!(chunk.occupied_count(), 2 * CHUNK_PLANE_SIZE as usize);
        assert!(chunk.get_block_at(Point3::new(0, 2, 0)).is_air());
    }
}
