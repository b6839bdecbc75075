//! # Fiber: ordered, thread-affine execution context.
//!
//! The [`Fiber`] owns a pending-action buffer, its lifecycle state, a timer
//! and a subscription registry. It borrows (shares) a [`ThreadAdapter`] and
//! an [`Execute`] implementation supplied by the caller.
//!
//! ## Submission flow
//! ```text
//! enqueue(a) ─► state? ─┬─ Stopped ──────────► drop (Bus: ActionsDropped)
//!                       ├─ Running ──────────► adapter.invoke(|| executor.execute(a))
//!                       └─ Created/Starting ─► lock ─► re-check ─┬─ Created/Starting ─► pending.push(a)
//!                                                                └─ changed ─────────► fall through
//! ```
//!
//! ## Start / stop
//! ```text
//! start():  lock ─► Created→Starting
//!           loop { lock ─► take pending ─┬─ empty ─► Starting→Running, unlock, done
//!                                        └─ batch ─► unlock ─► invoke(execute_all(batch)) }
//!                                                             (Bus: FiberStarted)
//!
//! stop():   timer.dispose() ─► lock ─► state=Stopped, discard pending ─► unlock
//!                           ─► subscriptions.dispose()        (Bus: FiberStopped)
//! ```
//!
//! ## Rules
//! - Actions submitted before `start()` run as one batch, before anything
//!   submitted after `start()` returns.
//! - Once `Stopped`, nothing is forwarded to the adapter again.
//! - The guard is held only for buffer/state changes, never across
//!   `adapter.invoke`. Adapters may deliver synchronously, on the caller's
//!   thread or another one, and the delivered actions may submit, stop, or
//!   schedule without deadlocking.
//! - Submissions that arrive while the start-up flush is in progress are
//!   buffered and flushed in a follow-up batch before the fiber turns
//!   `Running`, so they never overtake the start-up batch.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::mpsc;
//! use fiberkit::{DefaultExecutor, Fiber, InlineAdapter};
//!
//! let fiber = Fiber::builder(Arc::new(InlineAdapter::new()), Arc::new(DefaultExecutor::new()))
//!     .build()
//!     .unwrap();
//!
//! let (tx, rx) = mpsc::channel();
//! let t = tx.clone();
//! fiber.enqueue(move || t.send("buffered").unwrap());
//! fiber.start().unwrap();
//! fiber.enqueue(move || tx.send("direct").unwrap());
//!
//! assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["buffered", "direct"]);
//! fiber.stop();
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::{
    actions::{Action, DefaultExecutor, Execute},
    adapters::{DedicatedThread, ThreadAdapter},
    core::{
        Config, FiberBuilder,
        state::{ExecutionState, Phase, StateCell},
    },
    error::FiberError,
    events::{Bus, Event, EventKind},
    subscriptions::{SubscriptionHandle, Subscriptions},
    timer::{EnqueueTarget, Timer, TimerHandle, TimerService},
};

/// In-process execution context with ordered delivery and a three-state lifecycle.
pub struct Fiber {
    name: Arc<str>,
    state: StateCell,
    pending: Mutex<Vec<Action>>,
    adapter: Arc<dyn ThreadAdapter>,
    executor: Arc<dyn Execute>,
    timer: Timer,
    subscriptions: Subscriptions,
    bus: Bus,
}

impl Fiber {
    /// Starts building a fiber over the given adapter and executor.
    pub fn builder(adapter: Arc<dyn ThreadAdapter>, executor: Arc<dyn Execute>) -> FiberBuilder {
        FiberBuilder::new(adapter, executor)
    }

    /// Creates a fiber backed by its own OS thread named after `cfg.name`.
    ///
    /// Uses a [`DefaultExecutor`] reporting on the fiber's bus. The thread
    /// exits once the fiber is dropped and its queue is drained.
    pub fn dedicated(cfg: Config) -> Result<Arc<Fiber>, FiberError> {
        let adapter = Arc::new(DedicatedThread::spawn(cfg.name.clone())?);
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let executor = Arc::new(
            DefaultExecutor::new()
                .with_bus(bus.clone())
                .with_fiber(cfg.name.as_str()),
        );
        Fiber::builder(adapter, executor)
            .with_config(cfg)
            .with_bus(bus)
            .build()
    }

    pub(crate) fn new_internal(
        name: Arc<str>,
        adapter: Arc<dyn ThreadAdapter>,
        executor: Arc<dyn Execute>,
        service: TimerService,
        target: Weak<dyn EnqueueTarget>,
        bus: Bus,
    ) -> Self {
        Self {
            timer: Timer::new(service, target, bus.clone(), Arc::clone(&name)),
            subscriptions: Subscriptions::new(bus.clone(), Arc::clone(&name)),
            state: StateCell::new(),
            pending: Mutex::new(Vec::new()),
            name,
            adapter,
            executor,
            bus,
        }
    }

    /// Submits one action.
    ///
    /// - `Created`: buffered until [`start`](Self::start) (also while the
    ///   start-up flush is still in progress).
    /// - `Running`: forwarded to the adapter immediately.
    /// - `Stopped`: silently dropped.
    pub fn enqueue<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue_boxed(Box::new(f));
    }

    fn enqueue_boxed(&self, action: Action) {
        match self.state.load() {
            Phase::Stopped => return self.dropped(1),
            Phase::Running => return self.dispatch(action),
            Phase::Created | Phase::Starting => {}
        }

        let mut pending = self.pending.lock();
        match self.state.load() {
            Phase::Created | Phase::Starting => pending.push(action),
            Phase::Stopped => {
                drop(pending);
                self.dropped(1);
            }
            Phase::Running => {
                drop(pending);
                self.dispatch(action);
            }
        }
    }

    /// Submits an ordered batch of actions as one unit.
    ///
    /// Same state policy as [`enqueue`](Self::enqueue); a running fiber hands
    /// the whole batch to [`Execute::execute_all`] in a single invocation.
    pub fn enqueue_all(&self, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }
        match self.state.load() {
            Phase::Stopped => return self.dropped(actions.len()),
            Phase::Running => return self.dispatch_all(actions),
            Phase::Created | Phase::Starting => {}
        }

        let mut pending = self.pending.lock();
        match self.state.load() {
            Phase::Created | Phase::Starting => pending.extend(actions),
            Phase::Stopped => {
                drop(pending);
                self.dropped(actions.len());
            }
            Phase::Running => {
                drop(pending);
                self.dispatch_all(actions);
            }
        }
    }

    /// Enqueues `f` once after `delay`.
    pub fn schedule<F>(&self, f: F, delay: Duration) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.timer.schedule(Box::new(f), delay)
    }

    /// Enqueues `f` after `first`, then every `period` until cancelled or
    /// the fiber stops. A zero `period` fires once.
    pub fn schedule_on_interval<F>(&self, f: F, first: Duration, period: Duration) -> TimerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.timer.schedule_on_interval(Arc::new(f), first, period)
    }

    /// Ties `handle`'s teardown to this fiber's lifetime.
    ///
    /// Returns `false` if the fiber already stopped; the handle is then not
    /// stored and the caller keeps responsibility for it.
    pub fn register(&self, handle: SubscriptionHandle) -> bool {
        self.subscriptions.register(handle)
    }

    /// Removes `handle` without tearing it down. Returns whether it was registered.
    pub fn deregister(&self, handle: &SubscriptionHandle) -> bool {
        self.subscriptions.deregister(handle)
    }

    /// Number of registered subscriptions.
    pub fn num_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Transitions `Created → Running`, flushing buffered actions as one batch.
    ///
    /// The guard is released before each hand-off to the adapter. Anything
    /// submitted during the hand-off is flushed as a follow-up batch, in
    /// order, before the fiber accepts direct dispatch.
    ///
    /// # Errors
    /// [`FiberError::InvalidLifecycleTransition`] if the fiber is not `Created`.
    pub fn start(&self) -> Result<(), FiberError> {
        if !self.state.transition(Phase::Created, Phase::Starting) {
            return Err(FiberError::InvalidLifecycleTransition {
                from: self.state.load().public(),
            });
        }

        let mut flushed = 0;
        let running = loop {
            let mut pending = self.pending.lock();
            if pending.is_empty() {
                // Fails only if stop() ran while the flush was in progress.
                break self.state.transition(Phase::Starting, Phase::Running);
            }
            let batch = std::mem::take(&mut *pending);
            drop(pending);

            flushed += batch.len();
            self.dispatch_all(batch);
        };

        if running {
            self.bus.publish(
                Event::new(EventKind::FiberStarted)
                    .with_fiber(Arc::clone(&self.name))
                    .with_count(flushed),
            );
        }
        Ok(())
    }

    /// Stops the fiber: timers, then state, then subscriptions.
    ///
    /// Unconditional and idempotent. Buffered actions of a never-started
    /// fiber are discarded; actions already handed to the adapter may still
    /// run.
    pub fn stop(&self) {
        self.timer.dispose();

        let (previous, discarded) = {
            let mut pending = self.pending.lock();
            let previous = self.state.swap(Phase::Stopped);
            (previous, std::mem::take(&mut *pending))
        };

        if previous != Phase::Stopped {
            self.bus.publish(
                Event::new(EventKind::FiberStopped)
                    .with_fiber(Arc::clone(&self.name))
                    .with_count(discarded.len()),
            );
        }
        drop(discarded);

        self.subscriptions.dispose();
    }

    /// Alias for [`stop`](Self::stop).
    pub fn dispose(&self) {
        self.stop();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExecutionState {
        self.state.load().public()
    }

    /// The fiber's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of actions buffered while `Created`.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// The bus this fiber publishes its events on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    fn dispatch(&self, action: Action) {
        let executor = Arc::clone(&self.executor);
        self.adapter.invoke(Box::new(move || executor.execute(action)));
    }

    fn dispatch_all(&self, actions: Vec<Action>) {
        let executor = Arc::clone(&self.executor);
        self.adapter
            .invoke(Box::new(move || executor.execute_all(actions)));
    }

    fn dropped(&self, count: usize) {
        self.bus.publish(
            Event::new(EventKind::ActionsDropped)
                .with_fiber(Arc::clone(&self.name))
                .with_count(count),
        );
    }
}

impl EnqueueTarget for Fiber {
    fn enqueue_action(&self, action: Action) {
        self.enqueue_boxed(action);
    }
}

impl Drop for Fiber {
    fn drop(&mut self) {
        self.stop();
    }
}
