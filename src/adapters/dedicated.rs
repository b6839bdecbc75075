//! # DedicatedThread: one OS thread per fiber.
//!
//! ```text
//! invoke(cb) ──► [unbounded FIFO] ──► "fiber-name" thread ──► cb()
//! ```
//!
//! ## Rules
//! - Callbacks run strictly in `invoke` order on a single thread.
//! - A callback that panics is caught and reported on stderr; the thread keeps
//!   draining (executors normally contain failures before this point).
//! - After [`DedicatedThread::shutdown`] new callbacks are dropped; callbacks
//!   already queued still run before the thread exits.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::actions::{Action, panic_message};
use crate::error::FiberError;

use super::ThreadAdapter;

/// Adapter backed by a dedicated, named OS thread.
pub struct DedicatedThread {
    name: String,
    sender: Mutex<Option<mpsc::UnboundedSender<Action>>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl DedicatedThread {
    /// Spawns the worker thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self, FiberError> {
        let name = name.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let thread_name = name.clone();

        let join = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Some(callback) = rx.blocking_recv() {
                    if let Err(p) = catch_unwind(AssertUnwindSafe(callback)) {
                        eprintln!(
                            "[fiberkit] callback panicked on thread '{}': {}",
                            thread_name,
                            panic_message(p.as_ref())
                        );
                    }
                }
            })
            .map_err(|source| FiberError::ThreadSpawn {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            sender: Mutex::new(Some(tx)),
            join: Mutex::new(Some(join)),
        })
    }

    /// The worker thread's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closes the queue and waits for the worker to drain it.
    ///
    /// When called from the worker thread itself the join is skipped; the
    /// thread exits after the current callback returns. Idempotent.
    pub fn shutdown(&self) {
        drop(self.sender.lock().take());

        let join = self.join.lock().take();
        if let Some(join) = join {
            if join.thread().id() == thread::current().id() {
                return;
            }
            let _ = join.join();
        }
    }

    /// True until [`shutdown`](Self::shutdown) is called.
    pub fn is_open(&self) -> bool {
        self.sender.lock().is_some()
    }
}

impl ThreadAdapter for DedicatedThread {
    fn invoke(&self, callback: Action) {
        if let Some(tx) = self.sender.lock().as_ref() {
            let _ = tx.send(callback);
        }
    }
}

impl Drop for DedicatedThread {
    fn drop(&mut self) {
        // Detach: the worker drains what is queued and exits on its own.
        drop(self.sender.get_mut().take());
    }
}
