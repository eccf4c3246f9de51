//! # Primitive Shape Tables
//!
//! The building blocks every wire shape is composed from, shared read-only by all
//! cells of one wire family:
//!
//! * 6 node shapes, one per attachment face: the pad at the centre of the face
//! * 24 line shapes, one per (face, secondary direction): the strip running from the
//!   pad to the cell boundary on that face
//! * 12 edge shapes, one per cube edge: the short segment joining wires that meet
//!   diagonally across that edge

use crate::engine_state::config::{WireGeometry, SHAPE_RESOLUTION};
use crate::engine_state::error::{PrimitiveKind, WireError};
use crate::engine_state::voxels::block::block_side::BlockSide;

use super::edge::Edge;
use super::encoding::{secondary_side, EDGE_COUNT, FACE_COUNT, SUB_SIDE_COUNT};
use super::shape::{ShapeBox, WireShape};

/// The primitive shapes of one wire family.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveShapeTables {
    nodes: [WireShape; FACE_COUNT],
    lines: [WireShape; FACE_COUNT * SUB_SIDE_COUNT],
    edges: [WireShape; EDGE_COUNT],
}

impl PrimitiveShapeTables {
    /// Builds tables from explicit shapes.
    ///
    /// `lines` is indexed by `side * 4 + sub_side`, `edges` by edge index.
    ///
    /// # Errors
    /// `WireError::EmptyPrimitive` if any primitive has no geometry; such a table
    /// would make parts of a wire solid but invisible or the reverse.
    pub fn new(
        nodes: [WireShape; FACE_COUNT],
        lines: [WireShape; FACE_COUNT * SUB_SIDE_COUNT],
        edges: [WireShape; EDGE_COUNT],
    ) -> Result<Self, WireError> {
        let tables = PrimitiveShapeTables {
            nodes,
            lines,
            edges,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Builds the standard flat wire: a strip of `geometry.width` lying
    /// `geometry.thickness` deep against each face.
    pub fn from_geometry(geometry: WireGeometry) -> Result<Self, WireError> {
        geometry.validate()?;
        let builder = PrimitiveBuilder { geometry };

        let nodes = BlockSide::all().map(|side| builder.node(side));
        let lines = std::array::from_fn(|i| {
            let side = BlockSide::all()[i / SUB_SIDE_COUNT];
            builder.line(side, secondary_side(side, i % SUB_SIDE_COUNT))
        });
        let edges = Edge::all().map(|edge| builder.edge(edge));

        Self::new(nodes, lines, edges)
    }

    fn validate(&self) -> Result<(), WireError> {
        let tables = [
            (PrimitiveKind::Node, &self.nodes[..]),
            (PrimitiveKind::Line, &self.lines[..]),
            (PrimitiveKind::Edge, &self.edges[..]),
        ];
        for (kind, shapes) in tables {
            if let Some(index) = shapes.iter().position(WireShape::is_empty) {
                return Err(WireError::EmptyPrimitive { kind, index });
            }
        }
        Ok(())
    }

    /// The node shape for a wire on `side`.
    pub fn node(&self, side: BlockSide) -> &WireShape {
        &self.nodes[side.index()]
    }

    /// The line from the wire on `side` towards `sub_side`.
    pub fn line(&self, side: BlockSide, sub_side: usize) -> &WireShape {
        &self.lines[side.index() * SUB_SIDE_COUNT + sub_side]
    }

    /// The segment filling edge `edge_index`.
    pub fn edge(&self, edge_index: usize) -> &WireShape {
        &self.edges[edge_index]
    }
}

#[cfg(test)]
impl PrimitiveShapeTables {
    /// Tables with every edge segment empty, which `new` rejects.
    pub(crate) fn with_empty_edges(mut self) -> Self {
        self.edges = [WireShape::empty(); EDGE_COUNT];
        self
    }
}

/// Per-axis extents for the standard primitives.
struct PrimitiveBuilder {
    geometry: WireGeometry,
}

impl PrimitiveBuilder {
    /// The layer of the cell lying against `side`.
    fn slab(&self, side: BlockSide) -> (u8, u8) {
        if side.is_positive() {
            (SHAPE_RESOLUTION - self.geometry.thickness, SHAPE_RESOLUTION)
        } else {
            (0, self.geometry.thickness)
        }
    }

    /// From the edge of the centre band out to the cell boundary on `side`.
    fn reach(&self, side: BlockSide) -> (u8, u8) {
        if side.is_positive() {
            (self.geometry.band_max(), SHAPE_RESOLUTION)
        } else {
            (0, self.geometry.band_min())
        }
    }

    fn band(&self) -> (u8, u8) {
        (self.geometry.band_min(), self.geometry.band_max())
    }

    fn shape(&self, extents: [(BlockSide, (u8, u8)); 2]) -> WireShape {
        let mut min = [self.band().0; 3];
        let mut max = [self.band().1; 3];
        for (side, (lo, hi)) in extents {
            let axis = side.axis().component();
            min[axis] = lo;
            max[axis] = hi;
        }
        WireShape::from_box(ShapeBox::new(min, max))
    }

    fn node(&self, side: BlockSide) -> WireShape {
        self.shape([(side, self.slab(side)), (side, self.slab(side))])
    }

    fn line(&self, side: BlockSide, towards: BlockSide) -> WireShape {
        self.shape([(side, self.slab(side)), (towards, self.reach(towards))])
    }

    fn edge(&self, edge: Edge) -> WireShape {
        let (a, b) = edge.sides();
        self.shape([(a, self.slab(a)), (b, self.slab(b))])
    }
}
