//! # Expiry Sweep Task
//!
//! Evicts idle entries from the encoding-keyed shape cache of every wire family.

use log::debug;

use crate::engine_state::task_management::task::{Task, TaskResult};
use crate::engine_state::wires::family::WireFamilies;

/// Sweeps every family's shape cache once per run.
pub struct ExpirySweepTask {
    /// The families whose caches are swept. Cloning shares the underlying families.
    families: WireFamilies,
}

impl ExpirySweepTask {
    /// A sweep over every family in `families`.
    pub fn new(families: WireFamilies) -> Self {
        ExpirySweepTask { families }
    }
}

impl Task for ExpirySweepTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let evicted = self.families.sweep_expired();
        let remaining = self
            .families
            .iter()
            .map(|family| family.shape_cache().len())
            .sum();
        Box::new(ExpirySweepTaskResult { evicted, remaining })
    }
}

/// What one sweep removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirySweepTaskResult {
    /// Entries evicted by this sweep.
    pub evicted: usize,
    /// Entries left across all families.
    pub remaining: usize,
}

impl TaskResult for ExpirySweepTaskResult {
    fn handle_result(self: Box<Self>) {
        if self.evicted > 0 {
            debug!(
                "Expiry sweep evicted {} shapes, {} cached",
                self.evicted, self.remaining
            );
        }
    }
}
