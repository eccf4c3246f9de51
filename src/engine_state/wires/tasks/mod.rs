//! # Wire Task System
//!
//! Background maintenance for the wire caches. Tasks here run on a
//! [`PeriodicWorker`](crate::engine_state::task_management::PeriodicWorker) so that
//! eviction never holds up a foreground shape lookup for long.

pub mod expiry_sweep_task;

pub use expiry_sweep_task::{ExpirySweepTask, ExpirySweepTaskResult};
