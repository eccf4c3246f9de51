//! # Task Management System
//!
//! Runs maintenance work on a background thread without holding up foreground
//! lookups. A [`PeriodicWorker`] owns one thread that wakes at a fixed interval,
//! runs its task and sends the result back over a channel; the owner drains those
//! results whenever it likes with [`PeriodicWorker::process_completed_tasks`].
//!
//! ## Shutdown
//! The worker waits on a shutdown channel with a timeout equal to its interval, so
//! dropping the worker wakes it immediately instead of after the current sleep. Drop
//! joins the thread.
//!
//! ## Example Usage
//! ```rust
//! use std::time::Duration;
//! use wire_engine::engine_state::task_management::{
//!     task::{Task, TaskResult},
//!     PeriodicWorker,
//! };
//!
//! #[derive(Debug)]
//! struct Tick;
//! impl TaskResult for Tick {
//!     fn handle_result(self: Box<Self>) {}
//! }
//!
//! struct Ticker;
//! impl Task for Ticker {
//!     fn process(&self) -> Box<dyn TaskResult + Send> {
//!         Box::new(Tick)
//!     }
//! }
//!
//! let worker = PeriodicWorker::spawn("ticker", Duration::from_millis(5), Box::new(Ticker)).unwrap();
//! std::thread::sleep(Duration::from_millis(50));
//! assert!(worker.process_completed_tasks() > 0);
//! ```

pub mod task;

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

use log::{info, warn};
use web_time::Duration;

use crate::engine_state::error::WireError;
use task::{Task, TaskResult};

/// A background thread running one task at a fixed interval.
///
/// # Fields
/// - `shutdown_sender`: Dropping it tells the worker to stop
/// - `result_receiver`: Receives task results from the worker
/// - `worker`: Handle to the worker thread, joined on drop
#[derive(Debug)]
pub struct PeriodicWorker {
    name: String,
    shutdown_sender: Option<Sender<()>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    worker: Option<JoinHandle<()>>,
}

impl PeriodicWorker {
    /// Starts a worker thread that runs `task` every `interval`.
    ///
    /// The first run happens one interval after spawning.
    ///
    /// # Errors
    /// `WireError::WorkerSpawn` if the thread cannot be created.
    pub fn spawn(name: &str, interval: Duration, task: Box<dyn Task + Send>) -> Result<Self, WireError> {
        let (shutdown_tx, shutdown_rx) = channel::<()>();
        let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

        let task_closure = move || loop {
            match shutdown_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if result_tx.send(task.process()).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        };

        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(task_closure)
            .map_err(|source| WireError::WorkerSpawn {
                name: name.to_string(),
                source,
            })?;

        info!("Started worker {:?} with interval {:?}", name, interval);

        Ok(PeriodicWorker {
            name: name.to_string(),
            shutdown_sender: Some(shutdown_tx),
            result_receiver: result_rx,
            worker: Some(worker),
        })
    }

    /// The worker thread's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handles every result the worker has produced so far.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&self) -> usize {
        let mut handled = 0;
        while let Ok(result) = self.result_receiver.try_recv() {
            result.handle_result();
            handled += 1;
        }
        handled
    }

    /// Stops the worker and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown_sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Worker {:?} panicked", self.name);
            } else {
                info!("Stopped worker {:?}", self.name);
            }
        }
    }
}

impl Drop for PeriodicWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
