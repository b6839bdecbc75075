//! # Subscriptions - fiber-scoped registry of teardown handles.
//!
//! Ties the lifetime of dependents (channel subscriptions, sinks, ...) to a
//! fiber: whatever is still registered when the fiber stops is torn down.
//!
//! ## Architecture
//! ```text
//! register(h)   ──► HashMap<id, handle>          (guarded)
//! deregister(h) ──► remove(id) → bool
//! dispose()     ──► take map + mark disposed     (guarded)
//!                     └─► h.unsubscribe() for each (unguarded, panic-isolated)
//!                     └─► Bus(SubscriptionsDisposed{count})
//! ```
//!
//! ## Rules
//! - Every operation is safe under concurrent calls from arbitrary threads.
//! - Teardown hooks run outside the guard; a hook may call back into the
//!   registry without deadlocking.
//! - `dispose()` is idempotent: the second call finds nothing to tear down.
//! - After `dispose()`, `register()` ignores the handle and returns `false`;
//!   the caller still owns its teardown.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::actions::panic_message;
use crate::events::{Bus, Event, EventKind};

use super::SubscriptionHandle;

#[derive(Default)]
struct State {
    handles: HashMap<u64, SubscriptionHandle>,
    disposed: bool,
}

/// Thread-safe set of subscription handles owned by a fiber.
pub struct Subscriptions {
    state: Mutex<State>,
    bus: Bus,
    fiber: Arc<str>,
}

impl Subscriptions {
    /// Creates an empty registry that reports on `bus`.
    pub fn new(bus: Bus, fiber: impl Into<Arc<str>>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            bus,
            fiber: fiber.into(),
        }
    }

    /// Adds `handle` to the set.
    ///
    /// Returns `false` if the registry is already disposed (the handle is
    /// not stored) or the handle was already registered.
    pub fn register(&self, handle: SubscriptionHandle) -> bool {
        let mut state = self.state.lock();
        if state.disposed {
            return false;
        }
        state.handles.insert(handle.id(), handle).is_none()
    }

    /// Removes `handle` without running its teardown.
    ///
    /// Returns whether it was present.
    pub fn deregister(&self, handle: &SubscriptionHandle) -> bool {
        self.state.lock().handles.remove(&handle.id()).is_some()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.state.lock().handles.len()
    }

    /// True if no handles are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once [`dispose`](Self::dispose) ran.
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Tears down every registered handle exactly once and clears the set.
    ///
    /// Returns the number of teardown hooks this call invoked.
    pub fn dispose(&self) -> usize {
        let handles: Vec<SubscriptionHandle> = {
            let mut state = self.state.lock();
            if state.disposed {
                return 0;
            }
            state.disposed = true;
            state.handles.drain().map(|(_, h)| h).collect()
        };

        let mut invoked = 0;
        for handle in handles {
            match catch_unwind(AssertUnwindSafe(|| handle.unsubscribe())) {
                Ok(true) => invoked += 1,
                Ok(false) => {}
                Err(p) => {
                    invoked += 1;
                    self.bus.publish(
                        Event::new(EventKind::TeardownPanicked)
                            .with_fiber(Arc::clone(&self.fiber))
                            .with_error(panic_message(p.as_ref())),
                    );
                }
            }
        }

        self.bus.publish(
            Event::new(EventKind::SubscriptionsDisposed)
                .with_fiber(Arc::clone(&self.fiber))
                .with_count(invoked),
        );
        invoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> Subscriptions {
        Subscriptions::new(Bus::new(16), "subs-test")
    }

    fn counting(n: &Arc<AtomicUsize>) -> SubscriptionHandle {
        let c = n.clone();
        SubscriptionHandle::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn register_then_deregister() {
        let subs = registry();
        let h = SubscriptionHandle::new(|| {});

        assert!(subs.register(h.clone()));
        assert_eq!(subs.len(), 1);
        assert!(subs.deregister(&h));
        assert_eq!(subs.len(), 0);
        assert!(!subs.deregister(&h));
        assert!(!h.is_disposed());
    }

    #[test]
    fn duplicate_register_is_rejected() {
        let subs = registry();
        let h = SubscriptionHandle::new(|| {});
        assert!(subs.register(h.clone()));
        assert!(!subs.register(h));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn dispose_runs_each_teardown_once() {
        let subs = registry();
        let n = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            subs.register(counting(&n));
        }
        let manual = counting(&n);
        subs.register(manual.clone());
        assert!(manual.unsubscribe());

        assert_eq!(subs.dispose(), 5);
        assert_eq!(n.load(Ordering::SeqCst), 6);
        assert!(subs.is_empty());

        assert_eq!(subs.dispose(), 0);
        assert_eq!(n.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn register_after_dispose_is_ignored() {
        let subs = registry();
        subs.dispose();
        let n = Arc::new(AtomicUsize::new(0));
        let h = counting(&n);

        assert!(!subs.register(h.clone()));
        assert_eq!(subs.len(), 0);
        assert_eq!(n.load(Ordering::SeqCst), 0);
        assert!(h.unsubscribe());
    }

    #[test]
    fn panicking_teardown_is_isolated() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let subs = Subscriptions::new(bus, "subs-panic");
        let n = Arc::new(AtomicUsize::new(0));

        subs.register(SubscriptionHandle::new(|| panic!("teardown failed")));
        subs.register(counting(&n));
        subs.register(counting(&n));

        assert_eq!(subs.dispose(), 3);
        assert_eq!(n.load(Ordering::SeqCst), 2);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::TeardownPanicked));
        assert_eq!(kinds.last(), Some(&EventKind::SubscriptionsDisposed));
    }

    #[test]
    fn teardown_may_reenter_registry() {
        let subs = Arc::new(registry());
        let inner = subs.clone();
        subs.register(SubscriptionHandle::new(move || {
            let _ = inner.len();
            let _ = inner.register(SubscriptionHandle::new(|| {}));
        }));
        assert_eq!(subs.dispose(), 1);
        assert_eq!(subs.len(), 0);
    }

    #[test]
    fn concurrent_register_deregister_and_dispose() {
        let subs = Arc::new(registry());
        let barrier = Arc::new(std::sync::Barrier::new(9));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let subs = subs.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    (0..200)
                        .map(|i| {
                            let n = Arc::new(AtomicUsize::new(0));
                            let h = counting(&n);
                            let registered = subs.register(h.clone());
                            let deregistered = registered && i % 2 == 0 && subs.deregister(&h);
                            (n, registered, deregistered)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let disposer = {
            let subs = subs.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                std::thread::yield_now();
                subs.dispose()
            })
        };

        let outcomes: Vec<_> = workers
            .into_iter()
            .flat_map(|w| w.join().expect("worker"))
            .collect();
        let torn_down = disposer.join().expect("disposer");

        assert!(subs.is_disposed());
        assert_eq!(subs.len(), 0);

        let mut total = 0;
        for (n, registered, deregistered) in &outcomes {
            let runs = n.load(Ordering::SeqCst);
            assert!(runs <= 1);
            let expected = usize::from(*registered && !*deregistered);
            assert_eq!(runs, expected);
            total += runs;
        }
        assert_eq!(total, torn_down);
    }
}
