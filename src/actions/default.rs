//! # DefaultExecutor - per-action panic isolation.
//!
//! Every action runs under [`std::panic::catch_unwind`]. A panic is reported
//! and the next action runs as if nothing happened.
//!
//! ## Reporting
//! - with a bus attached: publishes [`EventKind::ActionPanicked`]
//! - without a bus: prints a `[fiberkit]` line to stderr

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::{Bus, Event, EventKind};

use super::{Action, Execute, panic_message};

/// Executor that isolates each action's failure from its siblings.
#[derive(Default, Clone, Debug)]
pub struct DefaultExecutor {
    bus: Option<Bus>,
    fiber: Option<Arc<str>>,
}

impl DefaultExecutor {
    /// Creates an executor that reports contained panics to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bus: None,
            fiber: None,
        }
    }

    /// Reports contained panics on `bus` instead of stderr.
    #[must_use]
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Names the fiber in every report.
    #[must_use]
    pub fn with_fiber(mut self, fiber: impl Into<Arc<str>>) -> Self {
        self.fiber = Some(fiber.into());
        self
    }

    fn report(&self, message: String) {
        let Some(bus) = &self.bus else {
            match &self.fiber {
                Some(fiber) => eprintln!("[fiberkit] action panicked: fiber={fiber} err={message}"),
                None => eprintln!("[fiberkit] action panicked: {message}"),
            }
            return;
        };
        let mut ev = Event::new(EventKind::ActionPanicked).with_error(message);
        if let Some(fiber) = &self.fiber {
            ev = ev.with_fiber(Arc::clone(fiber));
        }
        bus.publish(ev);
    }
}

impl Execute for DefaultExecutor {
    fn execute(&self, action: Action) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(action)) {
            self.report(panic_message(payload.as_ref()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn panic_does_not_stop_siblings() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let exec = DefaultExecutor::new().with_bus(bus);
        let ran = Arc::new(AtomicUsize::new(0));

        let r1 = ran.clone();
        let r3 = ran.clone();
        exec.execute_all(vec![
            Box::new(move || {
                r1.fetch_add(1, Ordering::SeqCst);
            }),
            Box::new(|| panic!("second fails")),
            Box::new(move || {
                r3.fetch_add(1, Ordering::SeqCst);
            }),
        ]);

        assert_eq!(ran.load(Ordering::SeqCst), 2);
        let ev = rx.try_recv().expect("panic event");
        assert_eq!(ev.kind, EventKind::ActionPanicked);
        assert_eq!(ev.error.as_deref(), Some("second fails"));
        assert_eq!(ev.fiber, None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reports_carry_the_fiber_name() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let exec = DefaultExecutor::new().with_bus(bus).with_fiber("ui");

        exec.execute(Box::new(|| panic!("named")));

        let ev = rx.try_recv().expect("panic event");
        assert_eq!(ev.kind, EventKind::ActionPanicked);
        assert_eq!(ev.fiber.as_deref(), Some("ui"));
    }

    #[test]
    fn single_panic_is_contained_without_bus() {
        let exec = DefaultExecutor::new();
        exec.execute(Box::new(|| panic!("no bus")));
    }
}
