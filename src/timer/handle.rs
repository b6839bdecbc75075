//! # Cancellable timer handles.
//!
//! A [`TimerHandle`] controls one scheduled callback (one-shot or recurring).
//!
//! ## State machine
//! ```text
//!            fire (one-shot)
//!   Armed ───────────────────► Fired
//!     │
//!     │ cancel()
//!     ▼
//!   Cancelled
//! ```
//! - `cancel()` and a one-shot firing race on a single CAS: exactly one wins.
//! - Recurring timers stay `Armed` between firings.
//! - Disposing the owning timer cancels the handle's token without touching
//!   the state; every delivery path checks the token, so nothing is delivered
//!   after disposal.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared state between a handle and its timer task.
#[derive(Debug)]
pub(crate) struct Slot {
    state: AtomicU8,
    token: CancellationToken,
    period: Duration,
    bus: Bus,
    fiber: Arc<str>,
}

impl Slot {
    /// Claims the single delivery of a one-shot timer.
    pub(crate) fn try_fire_once(&self) -> bool {
        !self.token.is_cancelled()
            && self
                .state
                .compare_exchange(ARMED, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    /// True while a recurring timer may still deliver.
    pub(crate) fn is_live(&self) -> bool {
        !self.token.is_cancelled() && self.state.load(Ordering::Acquire) == ARMED
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Handle to a scheduled one-shot or recurring callback.
///
/// Cloning yields another handle to the same timer. Dropping a handle does
/// **not** cancel the timer.
#[derive(Clone, Debug)]
pub struct TimerHandle {
    slot: Arc<Slot>,
}

impl TimerHandle {
    pub(crate) fn new(token: CancellationToken, period: Duration, bus: Bus, fiber: Arc<str>) -> Self {
        Self {
            slot: Arc::new(Slot {
                state: AtomicU8::new(ARMED),
                token,
                period,
                bus,
                fiber,
            }),
        }
    }

    pub(crate) fn slot(&self) -> Arc<Slot> {
        Arc::clone(&self.slot)
    }

    /// Cancels the timer.
    ///
    /// Returns `true` if this call prevented a future delivery, `false` if
    /// the timer had already fired (one-shot), been cancelled, or been
    /// disposed along with its fiber. After this returns, no further firing
    /// of the callback is delivered; a one-shot that already fired still runs.
    pub fn cancel(&self) -> bool {
        let won = self
            .slot
            .state
            .compare_exchange(ARMED, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !won {
            return false;
        }
        let disposed = self.slot.token.is_cancelled();
        self.slot.token.cancel();
        if disposed {
            return false;
        }

        self.slot.bus.publish(
            Event::new(EventKind::TimerCancelled)
                .with_fiber(Arc::clone(&self.slot.fiber))
                .with_delay(self.slot.period),
        );
        true
    }

    /// True once the timer can no longer deliver because of a cancellation
    /// or disposal.
    pub fn is_cancelled(&self) -> bool {
        self.slot.token.is_cancelled()
    }

    /// True once a one-shot timer has delivered its callback to the fiber.
    pub fn has_fired(&self) -> bool {
        self.slot.state.load(Ordering::Acquire) == FIRED
    }

    /// The delay (one-shot) or period (recurring) this timer was created with.
    pub fn period(&self) -> Duration {
        self.slot.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> TimerHandle {
        TimerHandle::new(
            CancellationToken::new(),
            Duration::from_millis(3),
            Bus::new(4),
            Arc::from("t"),
        )
    }

    #[test]
    fn cancel_wins_only_once() {
        let h = handle();
        assert!(h.cancel());
        assert!(!h.cancel());
        assert!(h.is_cancelled());
        assert!(!h.slot().try_fire_once());
    }

    #[test]
    fn fire_excludes_cancel() {
        let h = handle();
        assert!(h.slot().try_fire_once());
        assert!(!h.slot().try_fire_once());
        assert!(h.has_fired());
        assert!(!h.cancel());
    }

    #[test]
    fn parent_cancellation_disarms() {
        let parent = CancellationToken::new();
        let h = TimerHandle::new(parent.child_token(), Duration::ZERO, Bus::new(1), Arc::from("t"));
        assert!(h.slot().is_live());
        parent.cancel();
        assert!(h.is_cancelled());
        assert!(!h.slot().is_live());
        assert!(!h.cancel());
    }

    #[test]
    fn cancel_publishes_event() {
        let h = handle();
        let mut rx = h.slot.bus.subscribe();
        h.cancel();
        let ev = rx.try_recv().expect("event");
        assert_eq!(ev.kind, EventKind::TimerCancelled);
        assert_eq!(ev.delay, Some(Duration::from_millis(3)));
    }
}
