//! # Wire Families
//!
//! A wire family is one wire block type together with everything needed to give
//! its cells a shape: the composer built from its primitive tables, the
//! encoding-keyed cache over that composer, and the resolver that reads its
//! neighbourhood. Families are shared by every region.

use std::collections::BTreeMap;
use std::sync::Arc;

use cgmath::Point3;
use log::info;

use crate::engine_state::config::CacheConfig;
use crate::engine_state::error::WireError;
use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::grid::GridContext;

use super::composer::ShapeComposer;
use super::encoding::{AttachmentMask, ExpandedShapeIndex};
use super::encoding_cache::EncodingShapeCache;
use super::primitives::PrimitiveShapeTables;
use super::resolver::ConnectivityResolver;
use super::shape::WireShape;

/// One wire block type with its composer, shared shape cache and resolver.
pub struct WireFamily {
    block_type: BlockType,
    composer: Arc<ShapeComposer>,
    shapes: EncodingShapeCache,
    resolver: ConnectivityResolver,
}

impl WireFamily {
    /// Builds a family and its composer from `tables`.
    pub fn new(
        block_type: BlockType,
        tables: PrimitiveShapeTables,
        resolver: ConnectivityResolver,
        cache: &CacheConfig,
    ) -> Self {
        let composer = Arc::new(ShapeComposer::new(tables));
        WireFamily {
            block_type,
            shapes: EncodingShapeCache::new(composer.clone(), cache.idle_expiry()),
            composer,
            resolver,
        }
    }

    /// The wire block type this family handles.
    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// The resolver computing expanded indices for this family.
    pub fn resolver(&self) -> &ConnectivityResolver {
        &self.resolver
    }

    /// The shared cache of shapes by expanded index.
    pub fn shape_cache(&self) -> &EncodingShapeCache {
        &self.shapes
    }

    /// The expanded index of `block` at `position`.
    pub fn resolve(&self, block: &Block, grid: &dyn GridContext, position: Point3<i32>) -> ExpandedShapeIndex {
        self.resolver.resolve(block, grid, position)
    }

    /// The full shape of `block` at `position`, through the shared cache.
    pub fn shape_of(
        &self,
        block: &Block,
        grid: &dyn GridContext,
        position: Point3<i32>,
    ) -> Result<Arc<WireShape>, WireError> {
        self.shapes.get(self.resolve(block, grid, position))
    }

    /// The outline shape for `mask`, ignoring neighbours.
    ///
    /// Used where no grid is at hand, such as item rendering or selection outlines.
    pub fn render_shape(&self, mask: AttachmentMask) -> &WireShape {
        self.composer.primary_shape(mask)
    }
}

/// Every registered wire family, by block type.
#[derive(Default, Clone)]
pub struct WireFamilies {
    families: BTreeMap<BlockType, Arc<WireFamily>>,
}

impl WireFamilies {
    /// An empty family set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `family`, replacing any family of the same block type.
    pub fn register(&mut self, family: WireFamily) -> Arc<WireFamily> {
        let family = Arc::new(family);
        info!("Registered wire family {:?}", family.block_type());
        self.families.insert(family.block_type(), family.clone());
        family
    }

    /// The family for `block_type`, if registered.
    pub fn get(&self, block_type: BlockType) -> Option<&Arc<WireFamily>> {
        self.families.get(&block_type)
    }

    /// Every family in block type order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<WireFamily>> {
        self.families.values()
    }

    /// Sweeps idle entries from every family's shape cache.
    pub fn sweep_expired(&self) -> usize {
        self.iter().map(|family| family.shape_cache().sweep_expired()).sum()
    }
}
