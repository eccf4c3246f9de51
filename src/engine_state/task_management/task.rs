//! # Task System Core Traits
//!
//! The building blocks of background work in the engine.
//!
//! ## Task Lifecycle
//! 1. A `Task` is handed to a worker via `PeriodicWorker::spawn()`
//! 2. The task's `process()` method is called on the worker thread, once per interval
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owning thread from
//!    `PeriodicWorker::process_completed_tasks()`
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved onto the worker thread
//! - `TaskResult` must be `Send` to be transferred back to the owning thread
//! - All shared state must be properly synchronized

use std::fmt::Debug;

/// A unit of work run on a background worker.
///
/// Tasks should own everything they touch (usually `Arc`s to shared caches) and
/// must not block for long, since a periodic worker runs them back to back.
pub trait Task: Send {
    /// Performs one round of work on the worker thread.
    ///
    /// # Returns
    /// A boxed `TaskResult` to be handled on the owning thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of one `Task::process` call.
pub trait TaskResult: Send + Debug {
    /// Handles the result on the owning thread.
    fn handle_result(self: Box<Self>);
}
