//! # FailFastExecutor - stop the batch at the first failure.
//!
//! Alternate policy for batches whose actions depend on each other: once one
//! action panics, the remainder of that batch is skipped. The panic itself is
//! still contained; single-action calls behave like [`DefaultExecutor`](super::DefaultExecutor).

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::{Bus, Event, EventKind};

use super::{Action, Execute, panic_message};

/// Executor that abandons the rest of a batch after a panic.
#[derive(Default, Clone, Debug)]
pub struct FailFastExecutor {
    bus: Option<Bus>,
    fiber: Option<Arc<str>>,
}

impl FailFastExecutor {
    /// Creates an executor that reports to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bus: None,
            fiber: None,
        }
    }

    /// Reports on `bus` instead of stderr.
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

    fn event(&self, kind: EventKind) -> Event {
        let ev = Event::new(kind);
        match &self.fiber {
            Some(fiber) => ev.with_fiber(Arc::clone(fiber)),
            None => ev,
        }
    }

    fn run(action: Action) -> Result<(), String> {
        catch_unwind(AssertUnwindSafe(action)).map_err(|p| panic_message(p.as_ref()))
    }
}

impl Execute for FailFastExecutor {
    fn execute(&self, action: Action) {
        if let Err(message) = Self::run(action) {
            match &self.bus {
                Some(bus) => {
                    bus.publish(self.event(EventKind::ActionPanicked).with_error(message))
                }
                None => eprintln!("[fiberkit] action panicked: {message}"),
            }
        }
    }

    fn execute_all(&self, actions: Vec<Action>) {
        let mut iter = actions.into_iter();
        while let Some(action) = iter.next() {
            if let Err(message) = Self::run(action) {
                let skipped = iter.len();
                match &self.bus {
                    Some(bus) => bus.publish(
                        self.event(EventKind::BatchAborted)
                            .with_count(skipped)
                            .with_error(message),
                    ),
                    None => eprintln!(
                        "[fiberkit] batch aborted: skipped={skipped} err={message}"
                    ),
                }
                return;
            }
        }
    }
}
