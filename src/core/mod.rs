//! # Core Module
//!
//! This module provides the concurrency primitives shared by the rest of the wire
//! engine. Region caches, the region registry and the reference world all store
//! their state behind an [`MtResource`] so that shape queries can run from any
//! thread while the owning simulation thread mutates.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking

pub mod mt_resource;

pub use mt_resource::MtResource;
