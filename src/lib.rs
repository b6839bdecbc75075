//! # fiberkit
//!
//! **fiberkit** provides fibers: lightweight execution contexts that run
//! submitted work strictly in order on a pluggable thread of execution.
//!
//! A fiber buffers work until it is started, then forwards every submission
//! to its [`ThreadAdapter`]. Delayed and periodic work goes through the same
//! path, and callers may tie arbitrary teardown actions to the fiber's lifetime.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producers (any thread)          TimerService ("fiberkit-timer")
//!     │ enqueue / enqueue_all            │ sleep / interval tick
//!     ▼                                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Fiber                                                            │
//! │  - StateCell  (Created ─► Running ─► Stopped)                     │
//! │  - pending    (buffer while Created, flushed once by start())     │
//! │  - Timer      (one cancellation token per fiber, child per timer) │
//! │  - Subscriptions (teardowns disposed on stop)                     │
//! └──────┬─────────────────────────────────────────────────────┬──────┘
//!        │ invoke(|| executor.execute(a))                      │ publish
//!        ▼                                                     ▼
//! ┌──────────────────────┐     ┌───────────────┐     ┌───────────────────┐
//! │ ThreadAdapter        │ ──► │ Execute       │     │ Bus (broadcast)   │
//! │ Inline / Dedicated / │     │ Default /     │ ──► │  └─► ObserverSet  │
//! │ Runtime / custom     │     │ FailFast      │     │       └─► Observe │
//! └──────────────────────┘     └───────────────┘     └───────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Created ──start()──► Running ──stop()──► Stopped
//!    │                                        ▲
//!    └──────────────stop()────────────────────┘
//!
//! Created:  submissions buffered
//! Running:  submissions forwarded to the adapter
//! Stopped:  submissions dropped, timers cancelled, subscriptions disposed
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Fibers**        | Ordered submission, batch flush on start, idempotent stop.   | [`Fiber`], [`FiberBuilder`]                 |
//! | **Adapters**      | Where callbacks run: inline, own thread, tokio task.         | [`ThreadAdapter`], [`DedicatedThread`]      |
//! | **Executors**     | Failure isolation policy for actions and batches.            | [`Execute`], [`DefaultExecutor`]            |
//! | **Timers**        | One-shot and interval scheduling with strict cancellation.   | [`TimerHandle`], [`TimerService`]           |
//! | **Subscriptions** | Teardown actions bound to the fiber's lifetime.              | [`SubscriptionHandle`], [`Subscriptions`]   |
//! | **Events**        | Lifecycle and failure events on a broadcast bus.             | [`Bus`], [`Event`], [`Observe`]             |
//! | **Errors**        | Typed lifecycle and setup errors.                            | [`FiberError`]                              |
//! | **Configuration** | Per-fiber name and bus sizing.                               | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::mpsc;
//! use std::time::Duration;
//! use fiberkit::{Config, Fiber, SubscriptionHandle};
//!
//! fn main() -> Result<(), fiberkit::FiberError> {
//!     let fiber = Fiber::dedicated(Config::named("worker"))?;
//!     let (tx, rx) = mpsc::channel();
//!
//!     // Buffered until start(), then delivered as one batch.
//!     let t = tx.clone();
//!     fiber.enqueue(move || t.send("first").unwrap());
//!     fiber.start()?;
//!
//!     let t = tx.clone();
//!     fiber.schedule(move || t.send("later").unwrap(), Duration::from_millis(5));
//!
//!     fiber.register(SubscriptionHandle::new(|| println!("torn down")));
//!
//!     assert_eq!(rx.recv().unwrap(), "first");
//!     assert_eq!(rx.recv().unwrap(), "later");
//!
//!     fiber.stop();
//!     Ok(())
//! }
//! ```
mod actions;
mod adapters;
mod core;
mod error;
mod events;
mod observers;
mod subscriptions;
mod timer;

// ---- Public re-exports ----

pub use actions::{Action, DefaultExecutor, Execute, FailFastExecutor};
pub use adapters::{DedicatedThread, InlineAdapter, RuntimeAdapter, ThreadAdapter};
pub use core::{Config, ExecutionState, Fiber, FiberBuilder};
pub use error::FiberError;
pub use events::{Bus, Event, EventKind};
pub use observers::{ObserverSet, Observe};
pub use subscriptions::{SubscriptionHandle, Subscriptions};
pub use timer::{Repeating, TimerHandle, TimerService};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
