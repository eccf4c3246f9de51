//! # Block Type Module
//!
//! This module defines block type identities. Types are open-ended: the host grid can
//! mint new identifiers, and the wire engine keys its connector registry and wire
//! families by them. A handful of built-in types cover terrain, wires and the demo.

use std::fmt;

use super::BlockTypeSize;

/// Identity of the occupant of a cell.
///
/// Ordering follows the numeric identifier, which keeps registries keyed by block
/// type deterministic.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockType(pub BlockTypeSize);

impl BlockType {
    /// An empty cell.
    pub const AIR: BlockType = BlockType(0);

    /// Full solid terrain block.
    pub const STONE: BlockType = BlockType(1);

    /// Full solid terrain block.
    pub const DIRT: BlockType = BlockType(2);

    /// A transparent full block. Wires cannot attach to it.
    pub const GLASS: BlockType = BlockType(3);

    /// The standard flat wire.
    pub const RED_ALLOY_WIRE: BlockType = BlockType(16);

    /// A second wire family, used to check that families do not cross-connect.
    pub const COLORED_CABLE: BlockType = BlockType(17);

    /// A thin plate-like device that wires can run into.
    pub const LOGIC_PLATE: BlockType = BlockType(32);

    /// Whether every side of this block type can support an attached wire.
    pub fn is_solid(self) -> bool {
        matches!(self, BlockType::STONE | BlockType::DIRT)
    }

    /// Whether this is the empty block type.
    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BlockType::AIR => write!(f, "BlockType::AIR"),
            BlockType::STONE => write!(f, "BlockType::STONE"),
            BlockType::DIRT => write!(f, "BlockType::DIRT"),
            BlockType::GLASS => write!(f, "BlockType::GLASS"),
            BlockType::RED_ALLOY_WIRE => write!(f, "BlockType::RED_ALLOY_WIRE"),
            BlockType::COLORED_CABLE => write!(f, "BlockType::COLORED_CABLE"),
            BlockType::LOGIC_PLATE => write!(f, "BlockType::LOGIC_PLATE"),
            BlockType(other) => write!(f, "BlockType({})", other),
        }
    }
}

impl Default for BlockType {
    fn default() -> Self {
        BlockType::AIR
    }
}
