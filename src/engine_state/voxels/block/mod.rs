//! # Block Module
//!
//! This module provides the per-cell state stored by the host grid: the occupant's
//! block type and, for wires and plates, the mask of interior faces they are attached to.

use block_type::BlockType;

use crate::engine_state::wires::encoding::AttachmentMask;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u16;

/// Represents the state of a single cell in the world.
///
/// This is a lightweight value type. Cells that are not wires or plates keep an
/// empty attachment mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Block {
    /// The type of this block.
    pub block_type: BlockType,
    /// Interior faces this block is attached to.
    pub attachments: AttachmentMask,
}

impl Block {
    /// An empty cell.
    pub const AIR: Block = Block {
        block_type: BlockType::AIR,
        attachments: AttachmentMask::EMPTY,
    };

    /// Creates a new block of the specified type with no attachments.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type,
            attachments: AttachmentMask::EMPTY,
        }
    }

    /// Creates a block of the specified type attached to the given faces.
    pub fn attached(block_type: BlockType, attachments: AttachmentMask) -> Self {
        Block {
            block_type,
            attachments,
        }
    }

    /// Whether the cell holds nothing.
    pub fn is_air(&self) -> bool {
        self.block_type.is_air()
    }
}
