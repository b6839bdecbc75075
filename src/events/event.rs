//! # Runtime events emitted by fibers, executors and registries.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: fiber start/stop and work dropped by shutdown
//! - **Execution events**: failures contained by an executor
//! - **Teardown events**: timer cancellation and subscription disposal
//!
//! The [`Event`] struct carries additional metadata such as timestamps, fiber
//! name, counts and error messages.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use fiberkit::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActionsDropped)
//!     .with_fiber("ui")
//!     .with_count(3);
//!
//! assert_eq!(ev.kind, EventKind::ActionsDropped);
//! assert_eq!(ev.fiber.as_deref(), Some("ui"));
//! assert_eq!(ev.count, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Fiber transitioned `Created → Running`.
    ///
    /// Sets:
    /// - `fiber`: fiber name
    /// - `count`: number of buffered actions flushed as the first batch
    FiberStarted,

    /// Fiber transitioned to `Stopped` (emitted once, on the first stop).
    ///
    /// Sets:
    /// - `fiber`: fiber name
    /// - `count`: number of buffered actions discarded (stop before start)
    FiberStopped,

    /// Actions were submitted after the fiber stopped and were dropped.
    ///
    /// Sets:
    /// - `fiber`: fiber name
    /// - `count`: number of dropped actions
    ActionsDropped,

    // === Execution events ===
    /// An action panicked; the executor contained the panic.
    ///
    /// Sets:
    /// - `error`: panic message
    ActionPanicked,

    /// A fail-fast executor abandoned the rest of a batch after a panic.
    ///
    /// Sets:
    /// - `count`: number of actions skipped
    /// - `error`: panic message of the failing action
    BatchAborted,

    // === Teardown events ===
    /// A timer handle was cancelled before it stopped on its own.
    ///
    /// Sets:
    /// - `fiber`: fiber name
    /// - `delay`: the interval (or delay) of the cancelled timer
    TimerCancelled,

    /// The subscription registry was disposed.
    ///
    /// Sets:
    /// - `fiber`: fiber name
    /// - `count`: number of teardown hooks invoked
    SubscriptionsDisposed,

    /// A subscription teardown hook panicked during dispose.
    ///
    /// Sets:
    /// - `fiber`: fiber name
    /// - `error`: panic message
    TeardownPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the fiber, if applicable.
    pub fiber: Option<Arc<str>>,
    /// Number of affected items (actions, hooks).
    pub count: Option<usize>,
    /// Timer delay or period, if applicable.
    pub delay: Option<Duration>,
    /// Human-readable error (panic messages etc.).
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            fiber: None,
            count: None,
            delay: None,
            error: None,
        }
    }

    /// Attaches a fiber name.
    #[inline]
    pub fn with_fiber(mut self, fiber: impl Into<Arc<str>>) -> Self {
        self.fiber = Some(fiber.into());
        self
    }

    /// Attaches an item count.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Attaches a timer delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches an error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// True for events describing a contained failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ActionPanicked | EventKind::BatchAborted | EventKind::TeardownPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::FiberStarted);
        let b = Event::new(EventKind::FiberStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_fields() {
        let ev = Event::new(EventKind::TimerCancelled)
            .with_fiber("f")
            .with_delay(Duration::from_millis(5));
        assert_eq!(ev.delay, Some(Duration::from_millis(5)));
        assert!(ev.error.is_none());
        assert!(!ev.is_failure());
        assert!(Event::new(EventKind::ActionPanicked).is_failure());
    }
}
