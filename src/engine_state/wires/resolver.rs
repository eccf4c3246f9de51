//! # Connectivity Resolver
//!
//! Computes the expanded shape index of a wire cell from its surroundings.
//!
//! For every attached face, each of the four orthogonal directions is tested:
//! - if the cell also has a wire on that orthogonal face, the elbow already covers
//!   the corner and the secondary flag stays clear
//! - otherwise the neighbour one step in that direction is looked up and its
//!   occupant's connector decides
//!
//! Then every cube edge is tested against the family's edge rule. Resolution only
//! reads the grid, so it can run on any thread.

use std::sync::Arc;

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, Block};
use crate::engine_state::voxels::grid::GridContext;

use super::connector::{ConnectionQuery, ConnectorRegistry};
use super::edge::{Edge, EdgeVisibilityRule};
use super::encoding::{secondary_side, ExpandedShapeIndex, SUB_SIDE_COUNT};

/// Resolves wire connectivity for one wire family.
#[derive(Clone)]
pub struct ConnectivityResolver {
    connectors: Arc<ConnectorRegistry>,
    edge_rule: Arc<dyn EdgeVisibilityRule>,
}

impl ConnectivityResolver {
    /// A resolver using `connectors` for secondary flags and `edge_rule` for edges.
    pub fn new(connectors: Arc<ConnectorRegistry>, edge_rule: Arc<dyn EdgeVisibilityRule>) -> Self {
        ConnectivityResolver {
            connectors,
            edge_rule,
        }
    }

    /// Computes the full expanded index for `block` at `position`.
    ///
    /// Neighbours in unloaded cells never connect.
    pub fn resolve(&self, block: &Block, grid: &dyn GridContext, position: Point3<i32>) -> ExpandedShapeIndex {
        let mask = block.attachments;
        let mut index = ExpandedShapeIndex::from_primary(mask);

        for side in mask.sides() {
            for sub_side in 0..SUB_SIDE_COUNT {
                let secondary = secondary_side(side, sub_side);
                if mask.contains(secondary) {
                    continue;
                }
                if self.connects(block, grid, position, side, secondary) {
                    index = index.with_secondary(side, sub_side);
                }
            }
        }

        index.with_edge_flags(self.edge_flags(grid, position))
    }

    fn connects(
        &self,
        block: &Block,
        grid: &dyn GridContext,
        position: Point3<i32>,
        attachment_side: BlockSide,
        secondary: BlockSide,
    ) -> bool {
        let neighbor_position = secondary.step(position);
        let Some(neighbor_block) = grid.get_block(neighbor_position) else {
            return false;
        };
        let query = ConnectionQuery {
            grid,
            wire_position: position,
            wire_block: *block,
            attachment_side,
            direction_to_wire: secondary.opposite(),
            neighbor_position,
            neighbor_block,
        };
        self.connectors
            .get(neighbor_block.block_type)
            .can_connect_to_adjacent_wire(&query)
    }

    /// The 12 edge flags for `position`, edge 0 in bit 0.
    pub fn edge_flags(&self, grid: &dyn GridContext, position: Point3<i32>) -> u16 {
        Edge::all()
            .into_iter()
            .filter(|edge| self.edge_rule.should_edge_render(*edge, position, grid))
            .fold(0u16, |flags, edge| flags | (1 << edge.index()))
    }
}
