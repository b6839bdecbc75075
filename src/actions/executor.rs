//! # Executor abstraction.
//!
//! An executor runs actions on whatever thread calls it; the fiber always
//! calls it from inside a [`ThreadAdapter`](crate::ThreadAdapter) callback,
//! i.e. on the fiber's own execution context.
//!
//! ## Rules
//! - A failure in one action must not prevent the remaining actions of a
//!   batch from running, unless the executor's documented policy says so.
//! - A failure must never propagate out of `execute`/`execute_all`.

use super::Action;

/// # Runs one action or a batch with contained failures.
///
/// The fiber treats the executor as a capability: any policy (isolate every
/// action, stop at the first failure, add timing, ...) can be plugged in
/// without changing the fiber.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use fiberkit::{Action, Execute};
///
/// struct Counting(AtomicUsize);
///
/// impl Execute for Counting {
///     fn execute(&self, action: Action) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///         let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(action));
///     }
/// }
///
/// let exec = Counting(AtomicUsize::new(0));
/// exec.execute_all(vec![Box::new(|| {}), Box::new(|| panic!("contained"))]);
/// assert_eq!(exec.0.load(Ordering::Relaxed), 2);
/// ```
pub trait Execute: Send + Sync + 'static {
    /// Runs a single action, containing any failure it raises.
    fn execute(&self, action: Action);

    /// Runs a batch of actions in order.
    ///
    /// The default implementation calls [`Execute::execute`] for each action.
    fn execute_all(&self, actions: Vec<Action>) {
        for action in actions {
            self.execute(action);
        }
    }
}
