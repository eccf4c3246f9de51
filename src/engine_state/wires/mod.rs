//! # Wires Module
//!
//! Geometry and connectivity for wire blocks: cells whose six interior faces can
//! each carry a flat wire.
//!
//! ## Pipeline
//!
//! A topology change at a position reaches [`region::WireRegion::on_topology_changed`],
//! which drops the cached shapes around it and queues the position. When a shape is
//! next requested:
//!
//! 1. [`resolver::ConnectivityResolver`] reads the neighbourhood and produces an
//!    [`encoding::ExpandedShapeIndex`]
//! 2. [`encoding_cache::EncodingShapeCache`] returns the shape for that index,
//!    composing it with [`composer::ShapeComposer`] on first use
//! 3. [`position_cache::PositionShapeCache`] keeps the result for the position until
//!    the next invalidation
//!
//! ## Key Components
//!
//! * `encoding` - bit layout of attachment masks and expanded indices
//! * `shape` / `primitives` - voxel shapes and the primitive tables they are built from
//! * `connector` / `edge` - pluggable connection and edge visibility rules
//! * `family` - per wire type bundle of composer, cache and resolver
//! * `maintenance` - support and empty-cell rules for the host's update logic
//! * `tasks` - background expiry of idle shapes

pub mod composer;
pub mod connector;
pub mod edge;
pub mod encoding;
pub mod encoding_cache;
pub mod family;
pub mod maintenance;
pub mod position_cache;
pub mod primitives;
pub mod region;
pub mod resolver;
pub mod shape;
pub mod tasks;
pub mod update_buffer;
