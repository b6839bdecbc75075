//! Synchronous adapter: the caller's thread is the execution context.

use crate::actions::Action;

use super::ThreadAdapter;

/// Runs every callback immediately on the invoking thread.
///
/// Ordering is FIFO per producer thread. Work submitted from several threads
/// runs concurrently on those threads, so only use this adapter for fibers
/// driven from a single thread (tests, deterministic simulations).
#[derive(Default, Clone, Copy, Debug)]
pub struct InlineAdapter;

impl InlineAdapter {
    /// Construct a new [`InlineAdapter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ThreadAdapter for InlineAdapter {
    fn invoke(&self, callback: Action) {
        callback();
    }
}
