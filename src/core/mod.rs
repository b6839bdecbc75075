//! Runtime core: the fiber and its lifecycle.
//!
//! The public API from this module is [`Fiber`], built through
//! [`FiberBuilder`] and configured by [`Config`].
//!
//! Internal modules:
//! - [`fiber`]: pending buffer, start/stop, submission routing;
//! - [`builder`]: wires bus, timer service and observers;
//! - [`state`]: atomic lifecycle cell;
//! - [`config`]: per-fiber settings.

mod builder;
mod config;
mod fiber;
mod state;

pub use builder::FiberBuilder;
pub use config::Config;
pub use fiber::Fiber;
pub use state::ExecutionState;
