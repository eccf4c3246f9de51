//! # Wire Connectors
//!
//! Whether a wire line on one face reaches into a neighbouring cell depends on what
//! occupies that neighbour. Each occupant type can register a [`WireConnector`];
//! unregistered types fall back to the registry's default.

use std::collections::BTreeMap;
use std::sync::Arc;

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType, Block};
use crate::engine_state::voxels::grid::GridContext;

/// Everything a connector may look at when deciding one secondary connection.
pub struct ConnectionQuery<'a> {
    /// Read-only view of the grid.
    pub grid: &'a dyn GridContext,
    /// Position of the wire asking for the connection.
    pub wire_position: Point3<i32>,
    /// State of the wire asking for the connection.
    pub wire_block: Block,
    /// The face of the wire cell the line lies on.
    pub attachment_side: BlockSide,
    /// Direction from the neighbour back towards the wire.
    pub direction_to_wire: BlockSide,
    /// Position of the neighbour being tested.
    pub neighbor_position: Point3<i32>,
    /// State of the neighbour being tested.
    pub neighbor_block: Block,
}

/// Connectivity predicate for one family of occupants.
pub trait WireConnector: Send + Sync {
    /// Whether the wire described by `query` connects to its neighbour.
    fn can_connect_to_adjacent_wire(&self, query: &ConnectionQuery<'_>) -> bool;
}

impl<F> WireConnector for F
where
    F: Fn(&ConnectionQuery<'_>) -> bool + Send + Sync,
{
    fn can_connect_to_adjacent_wire(&self, query: &ConnectionQuery<'_>) -> bool {
        self(query)
    }
}

/// Plain blocks never pick up a wire line.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultConnector;

impl WireConnector for DefaultConnector {
    fn can_connect_to_adjacent_wire(&self, _query: &ConnectionQuery<'_>) -> bool {
        false
    }
}

/// Connects to neighbours of the same block type that carry a wire on the same face,
/// so a run of wire along a floor renders as one continuous strip.
#[derive(Copy, Clone, Debug, Default)]
pub struct AdjacentWireConnector;

impl WireConnector for AdjacentWireConnector {
    fn can_connect_to_adjacent_wire(&self, query: &ConnectionQuery<'_>) -> bool {
        query.neighbor_block.block_type == query.wire_block.block_type
            && query
                .neighbor_block
                .attachments
                .contains(query.attachment_side)
    }
}

/// Maps occupant types to their connectors, in block type order.
#[derive(Clone)]
pub struct ConnectorRegistry {
    connectors: BTreeMap<BlockType, Arc<dyn WireConnector>>,
    default_connector: Arc<dyn WireConnector>,
}

impl ConnectorRegistry {
    /// Creates a registry with no entries and the given fallback.
    pub fn new(default_connector: Arc<dyn WireConnector>) -> Self {
        ConnectorRegistry {
            connectors: BTreeMap::new(),
            default_connector,
        }
    }

    /// Registers `connector` for `block_type`, replacing any previous entry.
    pub fn register(&mut self, block_type: BlockType, connector: Arc<dyn WireConnector>) -> &mut Self {
        if self.connectors.insert(block_type, connector).is_some() {
            log::debug!("Replaced wire connector for {:?}", block_type);
        }
        self
    }

    /// The connector for `block_type`, or the default when none is registered.
    pub fn get(&self, block_type: BlockType) -> &dyn WireConnector {
        self.connectors
            .get(&block_type)
            .unwrap_or(&self.default_connector)
            .as_ref()
    }

    /// Registered block types, in order.
    pub fn registered_types(&self) -> impl Iterator<Item = BlockType> + '_ {
        self.connectors.keys().copied()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        ConnectorRegistry::new(Arc::new(DefaultConnector))
    }
}
