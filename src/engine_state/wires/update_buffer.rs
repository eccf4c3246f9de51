//! # Update Buffer
//!
//! Positions whose shape changed since the last tick, in first-enqueued order and
//! without duplicates. The tick driver drains the buffer once per tick and hands the
//! positions to whatever recomputes or broadcasts them.

use std::mem;
use std::sync::{Mutex, PoisonError};

use cgmath::Point3;
use indexmap::IndexSet;

/// Deduplicating queue of pending position updates for one region.
#[derive(Debug, Default)]
pub struct UpdateBuffer {
    pending: Mutex<IndexSet<Point3<i32>>>,
}

impl UpdateBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `position` unless it is already pending.
    ///
    /// # Returns
    /// `true` if the position was newly queued.
    pub fn enqueue(&self, position: Point3<i32>) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(position)
    }

    /// Takes every pending position and leaves the buffer empty.
    ///
    /// A position enqueued concurrently lands either in this flush or in the next,
    /// never both.
    pub fn flush(&self) -> Vec<Point3<i32>> {
        let taken = mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        taken.into_iter().collect()
    }

    /// Number of pending positions.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
