//! # Thread adapters: where a fiber's callbacks actually run.
//!
//! A [`ThreadAdapter`] takes a callback and runs it on the fiber's designated
//! execution context. The fiber makes no assumption about synchronous or
//! asynchronous delivery, only that delivery is FIFO and `invoke` never panics.
//!
//! ## Provided adapters
//! | Adapter              | Execution context                                      |
//! |----------------------|--------------------------------------------------------|
//! | [`InlineAdapter`]    | the calling thread, immediately (stub/test fibers)     |
//! | [`DedicatedThread`]  | one named OS thread draining a FIFO queue              |
//! | [`RuntimeAdapter`]   | one tokio task draining a FIFO queue (pool-backed)     |
//!
//! A GUI message loop or any other foreign event loop plugs in by implementing
//! the trait with its own "post to loop" primitive.

mod dedicated;
mod inline;
mod runtime;

pub use dedicated::DedicatedThread;
pub use inline::InlineAdapter;
pub use runtime::RuntimeAdapter;

use crate::actions::Action;

/// # Runs callbacks on a fiber's execution context.
///
/// ### Implementation requirements
/// - Callbacks are delivered in the order `invoke` was called.
/// - `invoke` must not panic for a well-formed callback; if the context is
///   gone, the callback is dropped.
/// - `invoke` may deliver synchronously (inline, or blocking until another
///   thread ran the callback); the fiber never holds its guard across it.
pub trait ThreadAdapter: Send + Sync + 'static {
    /// Runs `callback` on the execution context.
    fn invoke(&self, callback: Action);
}
