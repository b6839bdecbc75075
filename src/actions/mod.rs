//! # Actions and executors.
//!
//! This module provides the unit of work and the policies that run it:
//! - [`Action`] - a boxed zero-argument closure (`FnOnce() + Send`)
//! - [`Execute`] - trait for running one action or a batch with failure isolation
//! - [`DefaultExecutor`] - isolates every action; a panic never stops its siblings
//! - [`FailFastExecutor`] - contains the panic but abandons the rest of the batch
//!
//! ## Isolation contract
//! ```text
//! ThreadAdapter ──► invoke(|| executor.execute_all(batch))
//!                              │
//!                              ├─► action #1 ── ok
//!                              ├─► action #2 ── panic ──► caught ──► Bus(ActionPanicked)
//!                              └─► action #3 ── ok        (DefaultExecutor keeps going)
//! ```
//! No panic raised by an action ever unwinds into the thread adapter.

mod default;
mod executor;
mod fail_fast;

pub use default::DefaultExecutor;
pub use executor::Execute;
pub use fail_fast::FailFastExecutor;

use std::any::Any;

/// A unit of work: zero arguments, no return value, runs at most once.
pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_reads_str_and_string() {
        let p = std::panic::catch_unwind(|| {
            if true {
                panic!("boom")
            }
        })
        .unwrap_err();
        assert_eq!(panic_message(p.as_ref()), "boom");

        let n = 7;
        let p = std::panic::catch_unwind(move || {
            if n > 0 {
                panic!("bad {n}")
            }
        })
        .unwrap_err();
        assert_eq!(panic_message(p.as_ref()), "bad 7");

        let p = std::panic::catch_unwind(|| {
            if true {
                std::panic::panic_any(42u8)
            }
        })
        .unwrap_err();
        assert_eq!(panic_message(p.as_ref()), "non-string panic payload");
    }
}
