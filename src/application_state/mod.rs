//! # Application State Management
//!
//! Drives the demo scene used by the binary: a stone slab with a wire run that
//! climbs over its edge, a few randomly scattered wires, and a simple tick loop
//! feeding topology changes through the engine the way a host would.

use cgmath::Point3;
use log::{debug, info};
use web_time::Instant;

use crate::engine_state::{
    config::WireEngineConfig,
    error::WireError,
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, Block},
        chunk::Chunk,
        grid::GridContext,
        world::World,
    },
    wires::{
        encoding::AttachmentMask,
        maintenance,
        region::{RegionId, WireRegion},
    },
    WireEngine,
};

/// Height of the stone slab the demo wires rest on.
const FLOOR_LAYERS: i32 = 4;

/// Holds the engine, the world and the single demo region.
pub struct ApplicationState {
    /// The engine with the standard families.
    pub engine: WireEngine,
    /// The demo world.
    pub world: World,
    region: std::sync::Arc<WireRegion>,
    rng: fastrand::Rng,
}

impl ApplicationState {
    /// Builds the engine and an empty world of one loaded chunk column.
    pub fn new(config: WireEngineConfig, seed: u64) -> Result<Self, WireError> {
        let mut engine = WireEngine::with_standard_families(config)?;
        engine.start_sweeper()?;
        let region = engine.load_region(RegionId(0));

        let mut world = World::new();
        world.insert_chunk(Chunk::floor(
            &Point3::new(0, 0, 0),
            FLOOR_LAYERS,
            Block::new(BlockType::STONE),
        ));
        world.add_chunk_at(Point3::new(0, -1, 0));

        Ok(ApplicationState {
            engine,
            world,
            region,
            rng: fastrand::Rng::with_seed(seed),
        })
    }

    /// Places a block and reports the change, as the host's placement logic would.
    pub fn place(&self, position: Point3<i32>, block: Block) -> Result<(), WireError> {
        self.world.set_block(position, block)?;
        self.region.on_topology_changed(position);
        Ok(())
    }

    /// Lays a floor wire along x on top of the slab, then wraps it down the slab's
    /// east wall, leaving an edge-only cell at the outside corner.
    pub fn build_corner_run(&self) -> Result<(), WireError> {
        let top = FLOOR_LAYERS;
        let floor_wire = Block::attached(
            BlockType::RED_ALLOY_WIRE,
            AttachmentMask::from_sides(&[BlockSide::DOWN]),
        );
        let wall_wire = Block::attached(
            BlockType::RED_ALLOY_WIRE,
            AttachmentMask::from_sides(&[BlockSide::WEST]),
        );

        // the slab ends at x = 10
        for z in 0..16 {
            for y in 0..top {
                for x in 11..16 {
                    self.place(Point3::new(x, y, z), Block::AIR)?;
                }
            }
        }

        for x in 6..=10 {
            self.place(Point3::new(x, top, 8), floor_wire)?;
        }
        for y in (top - 3)..top {
            self.place(Point3::new(11, y, 8), wall_wire)?;
        }

        let last_floor = Point3::new(10, top, 8);
        let corner = BlockSide::EAST.step(last_floor);
        if maintenance::should_place_empty_wire(&floor_wire, &self.world, corner, BlockSide::EAST) {
            self.place(corner, Block::new(BlockType::RED_ALLOY_WIRE))?;
        }
        Ok(())
    }

    /// Scatters `count` single-face wires on the slab surface.
    pub fn scatter_wires(&mut self, count: usize) -> Result<(), WireError> {
        let top = FLOOR_LAYERS;
        for _ in 0..count {
            let position = Point3::new(self.rng.i32(0..6), top, self.rng.i32(0..16));
            let wire_type = if self.rng.bool() {
                BlockType::RED_ALLOY_WIRE
            } else {
                BlockType::COLORED_CABLE
            };
            let block = Block::attached(wire_type, AttachmentMask::from_sides(&[BlockSide::DOWN]));
            if maintenance::is_valid_position(&block, &self.world, position)
                && self.world.get_block(position).map_or(false, |b| b.is_air())
            {
                self.place(position, block)?;
            }
        }
        Ok(())
    }

    /// Runs one host tick: recomputes changed shapes and handles background results.
    pub fn tick(&self) -> Result<Vec<Point3<i32>>, WireError> {
        let started = Instant::now();
        let changed = self.region.tick(&self.world)?;
        self.engine.process_tasks();
        debug!("Tick recomputed {} positions in {:?}", changed.len(), started.elapsed());
        Ok(changed)
    }

    /// Logs the collision boxes of every changed position.
    pub fn report(&self, positions: &[Point3<i32>]) -> Result<(), WireError> {
        for position in positions {
            let shape = self.region.get_shape_at(&self.world, *position)?;
            if shape.is_empty() {
                continue;
            }
            let faces = self
                .world
                .get_block(*position)
                .map_or(0, |block| block.attachments.wire_count());
            info!(
                "{:?}: {} faces, {} boxes, {} sub-voxels",
                position,
                faces,
                shape.to_boxes().len(),
                shape.volume()
            );
        }
        Ok(())
    }

    /// The demo region.
    pub fn region(&self) -> &WireRegion {
        &self.region
    }
}

/// Builds the demo scene and runs a few ticks.
pub fn run_demo(config: WireEngineConfig) -> Result<(), WireError> {
    let mut state = ApplicationState::new(config, 0x5eed)?;
    state.build_corner_run()?;
    state.scatter_wires(12)?;

    for tick in 0..3 {
        let changed = state.tick()?;
        info!("Tick {}: {} positions changed", tick, changed.len());
        state.report(&changed)?;
    }

    for family in state.engine.families().iter() {
        info!(
            "{:?}: {} shapes cached, {} compositions",
            family.block_type(),
            family.shape_cache().len(),
            family.shape_cache().computations()
        );
    }

    state.engine.stop_sweeper();
    Ok(())
}
