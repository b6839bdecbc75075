//! # Fiber-owned timer.
//!
//! Schedules one-shot and recurring callbacks on the shared [`TimerService`]
//! and routes every firing through the owning fiber's enqueue path, so timer
//! work obeys the same lifecycle rules as any other submission.
//!
//! ## Flow
//! ```text
//! schedule(action, delay)
//!   └─► child token of the timer's root token
//!   └─► service.spawn(sleep(delay) | token.cancelled())
//!             └─► slot.try_fire_once()
//!                   └─► fiber.enqueue(|| if !token.cancelled { action() })
//!
//! schedule_on_interval(action, first, period)
//!   └─► interval_at(now + first, period), missed ticks skipped
//!             └─► each tick: fiber.enqueue(|| if !token.cancelled { action() })
//!
//! dispose()
//!   └─► root token cancelled ─► every child token cancelled
//! ```
//!
//! ## Rules
//! - The timer holds a **weak** reference to its fiber; a dropped fiber ends
//!   every timer loop on its next firing.
//! - A zero period degrades to a one-shot firing after `first`.
//! - Scheduling after [`Timer::dispose`] returns an already-cancelled handle.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::actions::Action;
use crate::events::Bus;

use super::handle::{Slot, TimerHandle};
use super::service::TimerService;

/// Callback for recurring timers.
pub type Repeating = Arc<dyn Fn() + Send + Sync + 'static>;

/// Something timer firings can be submitted to.
pub(crate) trait EnqueueTarget: Send + Sync + 'static {
    fn enqueue_action(&self, action: Action);
}

/// Per-fiber timer over a shared timing service.
pub(crate) struct Timer {
    service: TimerService,
    root: CancellationToken,
    target: Weak<dyn EnqueueTarget>,
    bus: Bus,
    fiber: Arc<str>,
}

impl Timer {
    pub(crate) fn new(
        service: TimerService,
        target: Weak<dyn EnqueueTarget>,
        bus: Bus,
        fiber: Arc<str>,
    ) -> Self {
        Self {
            service,
            root: CancellationToken::new(),
            target,
            bus,
            fiber,
        }
    }

    fn handle(&self, period: Duration) -> TimerHandle {
        TimerHandle::new(
            self.root.child_token(),
            period,
            self.bus.clone(),
            Arc::clone(&self.fiber),
        )
    }

    /// Enqueues `action` once after `delay`.
    pub(crate) fn schedule(&self, action: Action, delay: Duration) -> TimerHandle {
        let handle = self.handle(delay);
        if handle.is_cancelled() {
            return handle;
        }

        let slot = handle.slot();
        let target = self.target.clone();
        self.service.spawn(async move {
            tokio::select! {
                biased;
                _ = slot.token().cancelled() => {}
                _ = time::sleep(delay) => {
                    if slot.try_fire_once() {
                        deliver(&target, &slot, action);
                    }
                }
            }
        });
        handle
    }

    /// Enqueues `action` after `first`, then every `period`.
    pub(crate) fn schedule_on_interval(
        &self,
        action: Repeating,
        first: Duration,
        period: Duration,
    ) -> TimerHandle {
        if period.is_zero() {
            return self.schedule(Box::new(move || action()), first);
        }

        let handle = self.handle(period);
        if handle.is_cancelled() {
            return handle;
        }

        let slot = handle.slot();
        let target = self.target.clone();
        self.service.spawn(async move {
            let mut ticker = time::interval_at(deadline(first), period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = slot.token().cancelled() => break,
                    _ = ticker.tick() => {
                        if !slot.is_live() {
                            break;
                        }
                        let action = Arc::clone(&action);
                        if !deliver(&target, &slot, Box::new(move || action())) {
                            break;
                        }
                    }
                }
            }
        });
        handle
    }

    /// Cancels every handle this timer created, current and future.
    pub(crate) fn dispose(&self) {
        self.root.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_disposed(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Roughly 30 years; stands in for "never" when `now + delay` overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + delay`, saturating to a far-future instant.
fn deadline(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Submits one firing to the fiber. Returns `false` once the fiber is gone.
fn deliver(target: &Weak<dyn EnqueueTarget>, slot: &Arc<Slot>, action: Action) -> bool {
    let Some(target) = target.upgrade() else {
        return false;
    };
    let slot = Arc::clone(slot);
    target.enqueue_action(Box::new(move || {
        if !slot.token().is_cancelled() {
            action();
        }
    }));
    true
}
