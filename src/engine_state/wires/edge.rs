//! # Cube Edges
//!
//! The twelve edges of a cell, each where two orthogonal faces meet, and the
//! pluggable rule deciding which edges of a cell need a connecting segment.

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};
use crate::engine_state::voxels::grid::GridContext;

use super::encoding::EDGE_COUNT;

/// One of the twelve edges of a cell, named by the two faces that meet there.
#[allow(non_camel_case_types)]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Edge {
    /// Where the DOWN and NORTH faces meet.
    DOWN_NORTH = 0,
    /// Where the DOWN and SOUTH faces meet.
    DOWN_SOUTH = 1,
    /// Where the DOWN and WEST faces meet.
    DOWN_WEST = 2,
    /// Where the DOWN and EAST faces meet.
    DOWN_EAST = 3,
    /// Where the UP and NORTH faces meet.
    UP_NORTH = 4,
    /// Where the UP and SOUTH faces meet.
    UP_SOUTH = 5,
    /// Where the UP and WEST faces meet.
    UP_WEST = 6,
    /// Where the UP and EAST faces meet.
    UP_EAST = 7,
    /// Where the NORTH and WEST faces meet.
    NORTH_WEST = 8,
    /// Where the NORTH and EAST faces meet.
    NORTH_EAST = 9,
    /// Where the SOUTH and WEST faces meet.
    SOUTH_WEST = 10,
    /// Where the SOUTH and EAST faces meet.
    SOUTH_EAST = 11,
}

impl Edge {
    /// All edges in index order.
    pub fn all() -> [Edge; EDGE_COUNT] {
        [
            Edge::DOWN_NORTH,
            Edge::DOWN_SOUTH,
            Edge::DOWN_WEST,
            Edge::DOWN_EAST,
            Edge::UP_NORTH,
            Edge::UP_SOUTH,
            Edge::UP_WEST,
            Edge::UP_EAST,
            Edge::NORTH_WEST,
            Edge::NORTH_EAST,
            Edge::SOUTH_WEST,
            Edge::SOUTH_EAST,
        ]
    }

    /// Bit position of this edge within the 12 edge flags.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two faces meeting at this edge, lower face index first.
    pub fn sides(self) -> (BlockSide, BlockSide) {
        use BlockSide::*;
        match self {
            Edge::DOWN_NORTH => (DOWN, NORTH),
            Edge::DOWN_SOUTH => (DOWN, SOUTH),
            Edge::DOWN_WEST => (DOWN, WEST),
            Edge::DOWN_EAST => (DOWN, EAST),
            Edge::UP_NORTH => (UP, NORTH),
            Edge::UP_SOUTH => (UP, SOUTH),
            Edge::UP_WEST => (UP, WEST),
            Edge::UP_EAST => (UP, EAST),
            Edge::NORTH_WEST => (NORTH, WEST),
            Edge::NORTH_EAST => (NORTH, EAST),
            Edge::SOUTH_WEST => (SOUTH, WEST),
            Edge::SOUTH_EAST => (SOUTH, EAST),
        }
    }

    /// The edge between two faces, in either order.
    ///
    /// # Returns
    /// `None` if the faces share an axis.
    pub fn between(a: BlockSide, b: BlockSide) -> Option<Edge> {
        let key = if a < b { (a, b) } else { (b, a) };
        Edge::all().into_iter().find(|edge| edge.sides() == key)
    }
}

/// Decides whether an edge of the cell at `position` needs a connecting segment.
///
/// Implementations must be pure functions of the surrounding grid: they may be
/// called from any thread and speculatively.
pub trait EdgeVisibilityRule: Send + Sync {
    /// Whether `edge` of the cell at `position` gets a segment.
    fn should_edge_render(&self, edge: Edge, position: Point3<i32>, grid: &dyn GridContext) -> bool;
}

impl<F> EdgeVisibilityRule for F
where
    F: Fn(Edge, Point3<i32>, &dyn GridContext) -> bool + Send + Sync,
{
    fn should_edge_render(&self, edge: Edge, position: Point3<i32>, grid: &dyn GridContext) -> bool {
        self(edge, position, grid)
    }
}

/// Never renders edges.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoEdges;

impl EdgeVisibilityRule for NoEdges {
    fn should_edge_render(&self, _edge: Edge, _position: Point3<i32>, _grid: &dyn GridContext) -> bool {
        false
    }
}

/// Renders an edge where a wire wraps around the outside of a corner.
///
/// For the edge between faces A and B of the cell at P: the cell at P+B must be a
/// wire of `wire_type` attached to face A, and the cell at P+A must be a wire of
/// `wire_type` attached to face B. The two wires then meet diagonally across this
/// edge and the segment closes the gap between them. Unloaded cells never match.
#[derive(Copy, Clone, Debug)]
pub struct CornerWireEdgeRule {
    /// The wire type whose corners get edges.
    pub wire_type: BlockType,
}

impl CornerWireEdgeRule {
    /// A rule for wires of `wire_type`.
    pub fn new(wire_type: BlockType) -> Self {
        CornerWireEdgeRule { wire_type }
    }

    fn wire_attached(&self, grid: &dyn GridContext, position: Point3<i32>, face: BlockSide) -> bool {
        grid.get_block(position).map_or(false, |block| {
            block.block_type == self.wire_type && block.attachments.contains(face)
        })
    }
}

impl EdgeVisibilityRule for CornerWireEdgeRule {
    fn should_edge_render(&self, edge: Edge, position: Point3<i32>, grid: &dyn GridContext) -> bool {
        let (a, b) = edge.sides();
        self.wire_attached(grid, b.step(position), a) && self.wire_attached(grid, a.step(position), b)
    }
}
