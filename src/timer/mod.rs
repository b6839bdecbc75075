//! # Delayed and periodic scheduling.
//!
//! - [`TimerService`] - the shared runtime every fiber timer sleeps on
//! - [`TimerHandle`] - cancellable handle returned by `schedule*`
//! - `Timer` (internal) - the per-fiber timer owned and disposed by a fiber
//!
//! Firings never run the callback directly: they enqueue it onto the owning
//! fiber, so a stopped fiber drops them like any other late submission.

mod fiber_timer;
mod handle;
mod service;

pub(crate) use fiber_timer::{EnqueueTarget, Timer};
pub use fiber_timer::Repeating;
pub use handle::TimerHandle;
pub use service::TimerService;
