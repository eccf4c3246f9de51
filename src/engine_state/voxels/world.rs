//! # World Module
//!
//! This module provides the `World` struct, a reference host grid made of 16x16x16
//! chunks. The wire engine itself only needs the read-only [`GridContext`] view;
//! `World` exists so the engine can be driven end to end by the demo and by tests.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks that have been added are kept in memory.
//! Any position inside a chunk that was never added reads as unloaded.

use std::collections::HashMap;

use cgmath::Point3;

use crate::core::MtResource;
use crate::engine_state::error::WireError;
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::chunk::{Chunk, CHUNK_DIMENSION};

use super::grid::GridContext;

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use wire_engine::engine_state::voxels::{block::Block, grid::GridContext, world::World};
///
/// let mut world = World::new();
/// assert_eq!(world.get_block(Point3::new(0, 0, 0)), None);
///
/// world.add_chunk_at(Point3::new(0, 0, 0));
/// assert_eq!(world.get_block(Point3::new(0, 0, 0)), Some(Block::AIR));
/// ```
#[derive(Default)]
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    /// Chunks are stored in a thread-safe reference-counted wrapper so shape
    /// queries from other threads can read them.
    pub chunks: HashMap<Point3<i32>, MtResource<Chunk>>,
}

impl World {
    /// Creates a new, empty world with no chunks loaded.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Adds an empty chunk at the specified chunk coordinates if one doesn't already exist.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) {
        if self.chunks.contains_key(&position) {
            return;
        }

        self.chunks
            .insert(position, MtResource::new(Chunk::empty(&position)));
    }

    /// Inserts a prepared chunk, replacing any chunk already at its position.
    pub fn insert_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position, MtResource::new(chunk));
    }

    /// Unloads the chunk at the specified chunk coordinates.
    pub fn remove_chunk_at(&mut self, position: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.remove(&position)
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, pos: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&pos).cloned()
    }

    /// Splits a block position into chunk coordinates and chunk-relative coordinates.
    pub fn split_position(position: Point3<i32>) -> (Point3<i32>, Point3<usize>) {
        let chunk = Point3::new(
            position.x.div_euclid(CHUNK_DIMENSION),
            position.y.div_euclid(CHUNK_DIMENSION),
            position.z.div_euclid(CHUNK_DIMENSION),
        );
        let local = Point3::new(
            position.x.rem_euclid(CHUNK_DIMENSION) as usize,
            position.y.rem_euclid(CHUNK_DIMENSION) as usize,
            position.z.rem_euclid(CHUNK_DIMENSION) as usize,
        );
        (chunk, local)
    }

    /// Replaces the block at a world position.
    ///
    /// # Returns
    /// The previous block, or `WireError::ChunkNotLoaded` if the position's chunk
    /// has not been added.
    pub fn set_block(&self, position: Point3<i32>, block: Block) -> Result<Block, WireError> {
        let (chunk_position, local) = Self::split_position(position);
        let chunk = self
            .chunks
            .get(&chunk_position)
            .ok_or(WireError::ChunkNotLoaded {
                position: chunk_position,
            })?;
        let previous = chunk.get_mut().set_block_at(local, block);
        Ok(previous)
    }
}

impl GridContext for World {
    fn get_block(&self, position: Point3<i32>) -> Option<Block> {
        let (chunk_position, local) = Self::split_position(position);
        self.chunks
            .get(&chunk_position)
            .map(|chunk| chunk.get().get_block_at(local))
    }
}
