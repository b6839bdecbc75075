//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by fibers, executors, timers
//! and subscription registries.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Fiber` (start/stop/dropped work), `Timer` (cancellation),
//!   `Subscriptions` (dispose), `DefaultExecutor`/`FailFastExecutor` (panics).
//! - **Consumers**: the observer listener spawned by `FiberBuilder`
//!   (fans out to `ObserverSet`), or any receiver from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
