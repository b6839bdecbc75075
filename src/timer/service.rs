//! # Shared timing service.
//!
//! All fiber timers sleep on a [`TimerService`]: a handle to a tokio runtime
//! with the time driver enabled. Fibers share one service instead of owning
//! one OS timer each.
//!
//! ## Sources
//! - [`TimerService::shared`]: process-wide, lazily started background thread
//!   (`fiberkit-timer`) running a current-thread runtime. Works from any
//!   thread, inside or outside an async context.
//! - [`TimerService::current`]: the tokio runtime the caller is running on.
//! - [`TimerService::from_handle`]: any runtime handle.

use std::future::Future;
use std::sync::OnceLock;
use std::thread;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle};

use crate::error::FiberError;

/// Thread name of the process-wide timer thread.
const SHARED_THREAD_NAME: &str = "fiberkit-timer";

static SHARED: OnceLock<TimerService> = OnceLock::new();
static SHARED_INIT: Mutex<()> = parking_lot::const_mutex(());

/// Handle to the runtime that drives timer sleeps.
///
/// Cheap to clone.
#[derive(Clone, Debug)]
pub struct TimerService {
    handle: Handle,
}

impl TimerService {
    /// Wraps an existing runtime handle.
    ///
    /// The runtime must have the time driver enabled.
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the tokio runtime of the calling context.
    pub fn current() -> Result<Self, FiberError> {
        Handle::try_current()
            .map(Self::from_handle)
            .map_err(|e| FiberError::TimerService {
                reason: e.to_string(),
            })
    }

    /// Returns the process-wide service, starting its thread on first use.
    pub fn shared() -> Result<Self, FiberError> {
        if let Some(svc) = SHARED.get() {
            return Ok(svc.clone());
        }

        let _init = SHARED_INIT.lock();
        if let Some(svc) = SHARED.get() {
            return Ok(svc.clone());
        }
        let svc = Self::start_background(SHARED_THREAD_NAME)?;
        Ok(SHARED.get_or_init(|| svc).clone())
    }

    /// Builds a current-thread runtime and parks it on a named thread forever.
    fn start_background(name: &str) -> Result<Self, FiberError> {
        let rt = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| FiberError::TimerService {
                reason: e.to_string(),
            })?;
        let handle = rt.handle().clone();

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || rt.block_on(std::future::pending::<()>()))
            .map_err(|source| FiberError::ThreadSpawn {
                name: name.to_string(),
                source,
            })?;

        Ok(Self { handle })
    }

    /// The underlying runtime handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Spawns a detached future on the service runtime.
    pub(crate) fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.handle.spawn(fut));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn shared_runs_on_the_timer_thread() {
        let a = TimerService::shared().expect("shared");
        let b = TimerService::shared().expect("shared");
        let (tx, rx) = mpsc::channel();
        for svc in [a, b] {
            let tx = tx.clone();
            svc.spawn(async move {
                let _ = tx.send(thread::current().name().map(str::to_string));
            });
        }
        for _ in 0..2 {
            let name = rx.recv_timeout(Duration::from_secs(2)).expect("ran");
            assert_eq!(name.as_deref(), Some(SHARED_THREAD_NAME));
        }
    }

    #[test]
    fn current_fails_outside_runtime() {
        let err = TimerService::current().unwrap_err();
        assert_eq!(err.as_label(), "fiber_timer_service");
    }

    #[test]
    fn shared_drives_sleeps() {
        let svc = TimerService::shared().expect("shared");
        let (tx, rx) = mpsc::channel();
        svc.spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let _ = tx.send(());
        });
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }
}
