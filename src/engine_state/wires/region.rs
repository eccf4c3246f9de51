//! # Wire Region
//!
//! The per-region service a grid partition owns while it is loaded: the
//! position-keyed shape cache and the pending update buffer. Topology changes are
//! reported through [`WireRegion::on_topology_changed`], the one place that
//! invalidates cached shapes, and the host drains pending positions once per tick.

use std::fmt;
use std::sync::Arc;

use cgmath::Point3;
use log::debug;

use crate::engine_state::error::WireError;
use crate::engine_state::voxels::grid::GridContext;

use super::family::WireFamilies;
use super::position_cache::PositionShapeCache;
use super::shape::WireShape;
use super::update_buffer::UpdateBuffer;

/// Identifies one loaded grid partition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region {}", self.0)
    }
}

/// Shape lookups and pending updates for one loaded grid partition.
pub struct WireRegion {
    id: RegionId,
    families: WireFamilies,
    positions: PositionShapeCache,
    updates: UpdateBuffer,
    empty: Arc<WireShape>,
}

impl WireRegion {
    /// An empty region seeing the given families.
    pub fn new(id: RegionId, families: WireFamilies) -> Self {
        WireRegion {
            id,
            families,
            positions: PositionShapeCache::new(),
            updates: UpdateBuffer::new(),
            empty: Arc::new(WireShape::empty()),
        }
    }

    /// This region's identifier.
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Reports that the cell at `position` changed in a way that may alter wire
    /// topology. Drops the cached shapes of the cell and its face neighbours and
    /// queues the cell for the next tick.
    pub fn on_topology_changed(&self, position: Point3<i32>) {
        self.positions.invalidate_with_neighbors(position);
        if self.updates.enqueue(position) {
            debug!("{}: queued {:?}", self.id, position);
        }
    }

    /// The current shape of the cell at `position`.
    ///
    /// Cells that hold no registered wire, including unloaded ones, have the empty
    /// shape.
    ///
    /// # Errors
    /// Only if a family's primitive tables are corrupt.
    pub fn get_shape_at(&self, grid: &dyn GridContext, position: Point3<i32>) -> Result<Arc<WireShape>, WireError> {
        let shape = self.positions.get_or_insert_with(position, || {
            let Some(block) = grid.get_block(position) else {
                return Ok(None);
            };
            match self.families.get(block.block_type) {
                Some(family) => family.shape_of(&block, grid, position).map(Some),
                None => Ok(None),
            }
        })?;
        Ok(shape.unwrap_or_else(|| self.empty.clone()))
    }

    /// Takes every position queued since the last flush.
    pub fn flush_pending_updates(&self) -> Vec<Point3<i32>> {
        self.updates.flush()
    }

    /// Flushes pending updates and recomputes their shapes.
    ///
    /// # Returns
    /// The flushed positions, for the host to broadcast.
    pub fn tick(&self, grid: &dyn GridContext) -> Result<Vec<Point3<i32>>, WireError> {
        let positions = self.flush_pending_updates();
        for position in &positions {
            self.get_shape_at(grid, *position)?;
        }
        if !positions.is_empty() {
            debug!("{}: recomputed {} positions", self.id, positions.len());
        }
        Ok(positions)
    }

    /// Number of positions with a cached shape.
    pub fn cached_shapes(&self) -> usize {
        self.positions.len()
    }

    /// Number of positions waiting for the next tick.
    pub fn pending_updates(&self) -> usize {
        self.updates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::{CacheConfig, WireGeometry};
    use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType, Block};
    use crate::engine_state::voxels::world::World;
    use crate::engine_state::wires::connector::{AdjacentWireConnector, ConnectorRegistry};
    use crate::engine_state::wires::edge::CornerWireEdgeRule;
    use crate::engine_state::wires::encoding::AttachmentMask;
    use crate::engine_state::wires::family::WireFamily;
    use crate::engine_state::wires::primitives::PrimitiveShapeTables;
    use crate::engine_state::wires::resolver::ConnectivityResolver;

    fn region() -> WireRegion {
        let mut connectors = ConnectorRegistry::default();
        connectors.register(BlockType::RED_ALLOY_WIRE, Arc::new(AdjacentWireConnector));
        let mut families = WireFamilies::new();
        families.register(WireFamily::new(
            BlockType::RED_ALLOY_WIRE,
            PrimitiveShapeTables::from_geometry(WireGeometry::default()).unwrap(),
            ConnectivityResolver::new(
                Arc::new(connectors),
                Arc::new(CornerWireEdgeRule::new(BlockType::RED_ALLOY_WIRE)),
            ),
            &CacheConfig::default(),
        ));
        WireRegion::new(RegionId(0), families)
    }

    fn world() -> World {
        let mut world = World::new();
        world.add_chunk_at(Point3::new(0, 0, 0));
        world
    }

    fn floor_wire() -> Block {
        Block::attached(BlockType::RED_ALLOY_WIRE, AttachmentMask::from_sides(&[BlockSide::DOWN]))
    }

    #[test]
    fn non_wire_cells_have_the_empty_shape() {
        let region = region();
        let world = world();
        assert!(region.get_shape_at(&world, Point3::new(1, 1, 1)).unwrap().is_empty());
        assert!(region.get_shape_at(&world, Point3::new(100, 1, 1)).unwrap().is_empty());
        assert_eq!(region.cached_shapes(), 0);
    }

    #[test]
    fn invalidation_picks_up_a_new_neighbour() {
        let region = region();
        let world = world();
        let position = Point3::new(4, 4, 4);
        world.set_block(position, floor_wire()).unwrap();
        region.on_topology_changed(position);

        let alone = region.get_shape_at(&world, position).unwrap();
        assert!(Arc::ptr_eq(&alone, &region.get_shape_at(&world, position).unwrap()));

        let east = BlockSide::EAST.step(position);
        world.set_block(east, floor_wire()).unwrap();
        region.on_topology_changed(east);

        let joined = region.get_shape_at(&world, position).unwrap();
        assert_ne!(*alone, *joined);
        assert!(joined.contains_shape(&alone));
    }

    #[test]
    fn tick_drains_and_rewarms() {
        let region = region();
        let world = world();
        let a = Point3::new(2, 2, 2);
        let b = Point3::new(3, 2, 2);
        world.set_block(a, floor_wire()).unwrap();
        world.set_block(b, floor_wire()).unwrap();
        region.on_topology_changed(a);
        region.on_topology_changed(b);
        region.on_topology_changed(a);
        assert_eq!(region.pending_updates(), 2);

        assert_eq!(region.tick(&world).unwrap(), vec![a, b]);
        assert_eq!(region.pending_updates(), 0);
        assert_eq!(region.cached_shapes(), 2);
        assert!(region.tick(&world).unwrap().is_empty());
    }
}
