//! # Voxel Grid
//!
//! This module contains the host-side view of the voxel world that the wire engine
//! reads from.
//!
//! ## Architecture
//!
//! * **Block**: cell state (block type plus interior attachment mask) and the six faces
//! * **Grid**: the read-only `GridContext` trait the wire engine consumes
//! * **Chunk**: fixed-size 3D arrays of cells
//! * **World**: a sparse map of chunks implementing `GridContext`
//!
//! ## Thread Safety
//!
//! Chunks are stored behind `MtResource`, so a render thread can resolve wire
//! connectivity while the simulation thread writes other chunks.

pub mod block;
pub mod chunk;
pub mod grid;
pub mod world;
