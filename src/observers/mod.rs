//! # Event observers.
//!
//! This module provides the [`Observe`] trait and the fan-out machinery that
//! delivers events published on a fiber's [`Bus`](crate::Bus) to user code.
//!
//! ## Architecture
//! ```text
//! Fiber / Executor / Timer / Subscriptions
//!         └── publish(Event) ──► Bus ──► ObserverSet::listen()
//!                                             │
//!                                  ┌──────────┼──────────┐
//!                                  ▼          ▼          ▼
//!                              LogWriter   Metrics    Custom
//! ```
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.

#[cfg(feature = "logging")]
mod log;
mod observer;
mod set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observe;
pub use set::ObserverSet;
