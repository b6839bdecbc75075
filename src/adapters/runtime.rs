//! # RuntimeAdapter: a fiber hosted on a tokio runtime.
//!
//! One worker task drains an unbounded FIFO queue. The task may migrate
//! between runtime worker threads, but callbacks never overlap and keep their
//! `invoke` order, so the fiber still sees a single logical context.
//!
//! Callbacks run directly on a runtime worker: long blocking work stalls that
//! worker, so prefer [`DedicatedThread`](super::DedicatedThread) for it.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actions::{Action, panic_message};
use crate::timer::TimerService;

use super::ThreadAdapter;

/// Adapter backed by a single task on a tokio runtime.
pub struct RuntimeAdapter {
    sender: mpsc::UnboundedSender<Action>,
    worker: JoinHandle<()>,
}

impl RuntimeAdapter {
    /// Spawns the worker task on `handle`.
    pub fn spawn(handle: &Handle) -> Self {
        let (sender, mut rx) = mpsc::unbounded_channel::<Action>();
        let worker = handle.spawn(async move {
            while let Some(callback) = rx.recv().await {
                if let Err(p) = catch_unwind(AssertUnwindSafe(callback)) {
                    eprintln!(
                        "[fiberkit] callback panicked on runtime adapter: {}",
                        panic_message(p.as_ref())
                    );
                }
            }
        });
        Self { sender, worker }
    }

    /// Spawns the worker task on the runtime behind a [`TimerService`].
    pub fn on_service(service: &TimerService) -> Self {
        Self::spawn(service.handle())
    }

    /// True once the worker task has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }
}

impl ThreadAdapter for RuntimeAdapter {
    fn invoke(&self, callback: Action) {
        let _ = self.sender.send(callback);
    }
}
