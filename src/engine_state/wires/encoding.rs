//! # Wire Bit Encoding
//!
//! The single place where the wire bit layout is defined.
//!
//! An [`ExpandedShapeIndex`] packs everything that determines a wire cell's shape
//! into 42 bits, starting from the least significant bit:
//!
//! * bits 0-5: the primary index, one bit per attached interior face
//! * bits 6-29: 24 secondary flags, four per face, set when the wire on that face
//!   runs on into the neighbour in one of the four orthogonal directions
//! * bits 30-41: 12 edge flags, one per cube edge, set when a diagonal wire needs a
//!   connecting edge segment
//!
//! Secondary flag `6 + 4 * side + sub_side` is only ever set while primary bit `side`
//! is set. The four `sub_side` values enumerate the faces not on `side`'s axis in
//! ascending face order, see [`secondary_side`].

use std::fmt;

use crate::engine_state::voxels::block::block_side::{Axis, BlockSide};

/// Number of interior faces.
pub const FACE_COUNT: usize = 6;
/// Secondary directions per face.
pub const SUB_SIDE_COUNT: usize = 4;
/// Number of cube edges.
pub const EDGE_COUNT: usize = 12;
/// Number of distinct primary indices.
pub const PRIMARY_SHAPE_COUNT: usize = 1 << FACE_COUNT;

const PRIMARY_MASK: u64 = (1 << FACE_COUNT) - 1;
const SECONDARY_OFFSET: usize = FACE_COUNT;
const EDGE_OFFSET: usize = SECONDARY_OFFSET + FACE_COUNT * SUB_SIDE_COUNT;
/// Total number of meaningful bits in an expanded index.
pub const EXPANDED_BIT_COUNT: usize = EDGE_OFFSET + EDGE_COUNT;

/// Bit position of the secondary flag for `side` reaching towards `sub_side`.
pub fn secondary_flag_position(side: BlockSide, sub_side: usize) -> usize {
    debug_assert!(sub_side < SUB_SIDE_COUNT);
    SECONDARY_OFFSET + side.index() * SUB_SIDE_COUNT + sub_side
}

/// Bit position of the flag for edge `edge_index`.
pub fn edge_flag_position(edge_index: usize) -> usize {
    debug_assert!(edge_index < EDGE_COUNT);
    EDGE_OFFSET + edge_index
}

/// The face reached by `sub_side` from `side`.
///
/// ```
/// use wire_engine::engine_state::voxels::block::block_side::BlockSide;
/// use wire_engine::engine_state::wires::encoding::secondary_side;
///
/// assert_eq!(secondary_side(BlockSide::DOWN, 0), BlockSide::NORTH);
/// assert_eq!(secondary_side(BlockSide::NORTH, 2), BlockSide::WEST);
/// assert_eq!(secondary_side(BlockSide::EAST, 3), BlockSide::SOUTH);
/// ```
pub fn secondary_side(side: BlockSide, sub_side: usize) -> BlockSide {
    debug_assert!(sub_side < SUB_SIDE_COUNT);
    let axis_start = (side.index() / 2) * 2;
    let index = if sub_side >= axis_start {
        sub_side + 2
    } else {
        sub_side
    };
    BlockSide::all()[index]
}

/// Inverse of [`secondary_side`].
///
/// # Returns
/// `None` when `other` lies on the same axis as `side`.
pub fn compressed_secondary(side: BlockSide, other: BlockSide) -> Option<usize> {
    if side.axis() == other.axis() {
        return None;
    }
    let axis_start = (side.index() / 2) * 2;
    let index = other.index();
    Some(if index > axis_start { index - 2 } else { index })
}

/// The six per-face attachment flags of a wire cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttachmentMask(u8);

impl AttachmentMask {
    /// No face attached. Cells holding only edges carry this mask.
    pub const EMPTY: AttachmentMask = AttachmentMask(0);

    /// Every face attached.
    pub const ALL: AttachmentMask = AttachmentMask(PRIMARY_MASK as u8);

    /// Builds a mask with exactly the listed faces attached.
    pub fn from_sides(sides: &[BlockSide]) -> Self {
        sides
            .iter()
            .fold(AttachmentMask::EMPTY, |mask, side| mask.with(*side, true))
    }

    /// Decodes a primary index.
    ///
    /// Indices outside `0..64` are a programming error.
    pub fn from_index(index: u8) -> Self {
        debug_assert!((index as usize) < PRIMARY_SHAPE_COUNT, "primary index {} out of range", index);
        AttachmentMask(index & PRIMARY_MASK as u8)
    }

    /// The primary index: bit `side` set iff `side` is attached.
    pub fn primary_index(self) -> u8 {
        self.0
    }

    /// Whether `side` is attached.
    pub fn contains(self, side: BlockSide) -> bool {
        self.0 & (1 << side.index()) != 0
    }

    /// Returns a copy with `side` attached or detached.
    #[must_use]
    pub fn with(self, side: BlockSide, attached: bool) -> Self {
        if attached {
            AttachmentMask(self.0 | (1 << side.index()))
        } else {
            AttachmentMask(self.0 & !(1 << side.index()))
        }
    }

    /// Whether no face is attached.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of attached faces.
    pub fn wire_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Attached faces in face order.
    pub fn sides(self) -> impl Iterator<Item = BlockSide> {
        BlockSide::all()
            .into_iter()
            .filter(move |side| self.contains(*side))
    }

    /// Rotates the horizontal faces clockwise (seen from above) by `quarter_turns`.
    /// The vertical faces stay where they are.
    #[must_use]
    pub fn rotate_y(self, quarter_turns: i32) -> Self {
        const RING: [BlockSide; 4] = [
            BlockSide::NORTH,
            BlockSide::EAST,
            BlockSide::SOUTH,
            BlockSide::WEST,
        ];
        let turns = quarter_turns.rem_euclid(4) as usize;
        let mut result = self;
        for (i, side) in RING.iter().enumerate() {
            result = result.with(RING[(i + turns) % 4], self.contains(*side));
        }
        result
    }

    /// Swaps the two faces on `axis`.
    #[must_use]
    pub fn mirror(self, axis: Axis) -> Self {
        let (negative, positive) = match axis {
            Axis::X => (BlockSide::WEST, BlockSide::EAST),
            Axis::Y => (BlockSide::DOWN, BlockSide::UP),
            Axis::Z => (BlockSide::NORTH, BlockSide::SOUTH),
        };
        self.with(negative, self.contains(positive))
            .with(positive, self.contains(negative))
    }
}

impl fmt::Debug for AttachmentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sides()).finish()
    }
}

/// The full 42-bit key of a wire cell's shape.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ExpandedShapeIndex(u64);

impl ExpandedShapeIndex {
    /// An index carrying only the primary mask.
    pub fn from_primary(mask: AttachmentMask) -> Self {
        ExpandedShapeIndex(mask.primary_index() as u64)
    }

    /// Wraps raw bits. Bits above bit 41 are discarded.
    pub fn from_bits(bits: u64) -> Self {
        ExpandedShapeIndex(bits & ((1 << EXPANDED_BIT_COUNT) - 1))
    }

    /// The raw 42 bits.
    pub fn bits(self) -> u64 {
        self.0
    }

    /// The primary index as an attachment mask.
    pub fn primary_mask(self) -> AttachmentMask {
        AttachmentMask((self.0 & PRIMARY_MASK) as u8)
    }

    /// Returns a copy with the secondary flag for `side` towards `sub_side` set.
    #[must_use]
    pub fn with_secondary(self, side: BlockSide, sub_side: usize) -> Self {
        ExpandedShapeIndex(self.0 | (1 << secondary_flag_position(side, sub_side)))
    }

    /// Whether the secondary flag for `side` towards `sub_side` is set.
    pub fn has_secondary(self, side: BlockSide, sub_side: usize) -> bool {
        self.0 & (1 << secondary_flag_position(side, sub_side)) != 0
    }

    /// Returns a copy with edge `edge_index` set.
    #[must_use]
    pub fn with_edge(self, edge_index: usize) -> Self {
        ExpandedShapeIndex(self.0 | (1 << edge_flag_position(edge_index)))
    }

    /// Whether edge `edge_index` is set.
    pub fn has_edge(self, edge_index: usize) -> bool {
        self.0 & (1 << edge_flag_position(edge_index)) != 0
    }

    /// Merges a set of edge flags, given as 12 bits with edge 0 in bit 0.
    #[must_use]
    pub fn with_edge_flags(self, edge_flags: u16) -> Self {
        ExpandedShapeIndex(self.0 | (((edge_flags as u64) & 0xfff) << EDGE_OFFSET))
    }

    /// The 12 edge flags, edge 0 in bit 0.
    pub fn edge_flags(self) -> u16 {
        ((self.0 >> EDGE_OFFSET) & 0xfff) as u16
    }

    /// The 24 secondary flags, face 0 / sub side 0 in bit 0.
    pub fn secondary_flags(self) -> u32 {
        ((self.0 >> SECONDARY_OFFSET) & 0xff_ffff) as u32
    }

    /// Whether every secondary flag belongs to an attached face.
    pub fn is_well_formed(self) -> bool {
        let mask = self.primary_mask();
        BlockSide::all().into_iter().all(|side| {
            mask.contains(side)
                || (0..SUB_SIDE_COUNT).all(|sub_side| !self.has_secondary(side, sub_side))
        })
    }
}

impl fmt::Debug for ExpandedShapeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandedShapeIndex")
            .field("primary", &self.primary_mask())
            .field("secondary", &format_args!("{:#08x}", self.secondary_flags()))
            .field("edges", &format_args!("{:#05x}", self.edge_flags()))
            .finish()
    }
}
