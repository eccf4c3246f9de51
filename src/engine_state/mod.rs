//! # Engine State Module
//!
//! The coordinator of the wire engine. A [`WireEngine`] owns the registered wire
//! families, the loaded regions and the background sweeper that expires idle shapes.
//!
//! ## Key Components
//!
//! * `WireEngine` - family registration, region lifecycle and background maintenance
//! * `config` - tunables loaded from JSON
//! * `error` - the crate error type
//! * `task_management` - the periodic background worker
//! * `voxels` - the reference host grid (blocks, chunks, world)
//! * `wires` - encoding, composition, connectivity and caching of wire shapes
//!
//! ## Lifecycle
//!
//! Families are registered first. Regions are created when the host loads a grid
//! partition and dropped when it unloads; each region keeps its own position cache
//! and update buffer while the encoding caches are shared through the families.
//! Regions loaded before a family is registered do not see that family.
//!
//! ```
//! use cgmath::Point3;
//! use wire_engine::engine_state::{
//!     config::WireEngineConfig,
//!     voxels::{block::{block_side::BlockSide, block_type::BlockType, Block}, world::World},
//!     wires::{encoding::AttachmentMask, region::RegionId},
//!     WireEngine,
//! };
//!
//! let engine = WireEngine::with_standard_families(WireEngineConfig::default()).unwrap();
//! let region = engine.load_region(RegionId(0));
//!
//! let mut world = World::new();
//! world.add_chunk_at(Point3::new(0, 0, 0));
//! let position = Point3::new(1, 1, 1);
//! let wire = Block::attached(BlockType::RED_ALLOY_WIRE, AttachmentMask::from_sides(&[BlockSide::DOWN]));
//! world.set_block(position, wire).unwrap();
//! region.on_topology_changed(position);
//!
//! assert_eq!(region.tick(&world).unwrap(), vec![position]);
//! assert!(!region.get_shape_at(&world, position).unwrap().is_empty());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use crate::core::MtResource;
use config::WireEngineConfig;
use error::WireError;
use task_management::PeriodicWorker;
use voxels::block::block_type::BlockType;
use wires::{
    connector::{AdjacentWireConnector, ConnectionQuery, ConnectorRegistry},
    edge::{CornerWireEdgeRule, EdgeVisibilityRule},
    family::{WireFamilies, WireFamily},
    primitives::PrimitiveShapeTables,
    region::{RegionId, WireRegion},
    resolver::ConnectivityResolver,
    tasks::ExpirySweepTask,
};

pub mod config;
pub mod error;
pub mod task_management;
pub mod voxels;
pub mod wires;

/// Name of the background thread that expires idle shapes.
pub const EXPIRY_SWEEPER_NAME: &str = "wire-shape-sweeper";

/// The main state container for the wire engine.
pub struct WireEngine {
    config: WireEngineConfig,
    families: WireFamilies,
    regions: MtResource<HashMap<RegionId, Arc<WireRegion>>>,
    sweeper: Option<PeriodicWorker>,
}

impl WireEngine {
    /// Creates an engine with no families.
    ///
    /// # Errors
    /// The configuration's validation error, if any.
    pub fn new(config: WireEngineConfig) -> Result<Self, WireError> {
        config.validate()?;
        Ok(WireEngine {
            config,
            families: WireFamilies::new(),
            regions: MtResource::new(HashMap::new()),
            sweeper: None,
        })
    }

    /// Creates an engine with the red alloy wire and coloured cable families.
    ///
    /// Both connect to runs of their own type on the same face and to logic plates
    /// sitting on that face, and render corner edges between their own wires.
    pub fn with_standard_families(config: WireEngineConfig) -> Result<Self, WireError> {
        let mut engine = Self::new(config)?;
        for wire_type in [BlockType::RED_ALLOY_WIRE, BlockType::COLORED_CABLE] {
            let mut connectors = ConnectorRegistry::default();
            connectors
                .register(wire_type, Arc::new(AdjacentWireConnector))
                .register(
                    BlockType::LOGIC_PLATE,
                    Arc::new(|query: &ConnectionQuery<'_>| {
                        query.neighbor_block.attachments.contains(query.attachment_side)
                    }),
                );
            engine.register_family(wire_type, connectors, Arc::new(CornerWireEdgeRule::new(wire_type)))?;
        }
        Ok(engine)
    }

    /// Registers a wire family built from the configured geometry.
    pub fn register_family(
        &mut self,
        block_type: BlockType,
        connectors: ConnectorRegistry,
        edge_rule: Arc<dyn EdgeVisibilityRule>,
    ) -> Result<Arc<WireFamily>, WireError> {
        let tables = PrimitiveShapeTables::from_geometry(self.config.geometry)?;
        let resolver = ConnectivityResolver::new(Arc::new(connectors), edge_rule);
        Ok(self
            .families
            .register(WireFamily::new(block_type, tables, resolver, &self.config.cache)))
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &WireEngineConfig {
        &self.config
    }

    /// Every registered wire family.
    pub fn families(&self) -> &WireFamilies {
        &self.families
    }

    /// Returns the region for `id`, creating it if it is not loaded.
    pub fn load_region(&self, id: RegionId) -> Arc<WireRegion> {
        let mut regions = self.regions.get_mut();
        regions
            .entry(id)
            .or_insert_with(|| {
                info!("Loaded {}", id);
                Arc::new(WireRegion::new(id, self.families.clone()))
            })
            .clone()
    }

    /// Drops the region for `id` together with its caches and pending updates.
    ///
    /// # Returns
    /// Whether the region was loaded.
    pub fn unload_region(&self, id: RegionId) -> bool {
        let removed = self.regions.get_mut().remove(&id);
        if let Some(region) = &removed {
            info!(
                "Unloaded {} with {} cached shapes, {} pending updates",
                id,
                region.cached_shapes(),
                region.pending_updates()
            );
        }
        removed.is_some()
    }

    /// The region for `id`, if it is loaded.
    pub fn region(&self, id: RegionId) -> Option<Arc<WireRegion>> {
        self.regions.get().get(&id).cloned()
    }

    /// Number of loaded regions.
    pub fn loaded_regions(&self) -> usize {
        self.regions.get().len()
    }

    /// Starts the background sweep of idle shapes. Does nothing if it is running.
    pub fn start_sweeper(&mut self) -> Result<(), WireError> {
        if self.sweeper.is_some() {
            return Ok(());
        }
        let task = ExpirySweepTask::new(self.families.clone());
        self.sweeper = Some(PeriodicWorker::spawn(
            EXPIRY_SWEEPER_NAME,
            self.config.cache.sweep_interval(),
            Box::new(task),
        )?);
        Ok(())
    }

    /// Stops the background sweep and waits for it to exit.
    pub fn stop_sweeper(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            debug!("Stopping {}", sweeper.name());
            sweeper.shutdown();
        }
    }

    /// Whether the background sweep is running.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.is_some()
    }

    /// Handles results from background tasks. Call once per tick.
    pub fn process_tasks(&self) -> usize {
        self.sweeper
            .as_ref()
            .map_or(0, PeriodicWorker::process_completed_tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_created_once_and_dropped_on_unload() {
        let engine = WireEngine::with_standard_families(WireEngineConfig::default()).unwrap();
        let first = engine.load_region(RegionId(7));
        let again = engine.load_region(RegionId(7));
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(engine.loaded_regions(), 1);

        assert!(engine.unload_region(RegionId(7)));
        assert!(!engine.unload_region(RegionId(7)));
        assert!(engine.region(RegionId(7)).is_none());
    }

    #[test]
    fn standard_families_are_registered() {
        let engine = WireEngine::with_standard_families(WireEngineConfig::default()).unwrap();
        assert!(engine.families().get(BlockType::RED_ALLOY_WIRE).is_some());
        assert!(engine.families().get(BlockType::COLORED_CABLE).is_some());
        assert!(engine.families().get(BlockType::LOGIC_PLATE).is_none());
    }

    #[test]
    fn sweeper_starts_and_stops() {
        let mut engine = WireEngine::new(WireEngineConfig::default()).unwrap();
        engine.start_sweeper().unwrap();
        engine.start_sweeper().unwrap();
        assert!(engine.is_sweeper_running());
        assert_eq!(engine.sweeper.as_ref().unwrap().name(), EXPIRY_SWEEPER_NAME);
        assert_eq!(engine.process_tasks(), 0);
        engine.stop_sweeper();
        assert!(!engine.is_sweeper_running());
    }

    #[test]
    fn invalid_geometry_is_rejected_up_front() {
        let mut config = WireEngineConfig::default();
        config.geometry.width = 5;
        assert!(matches!(
            WireEngine::new(config),
            Err(WireError::InvalidGeometry(_))
        ));
    }
}
