//! Error types used by fiberkit.
//!
//! A single enum, [`FiberError`], covers the programming-contract violations
//! and setup failures that are surfaced synchronously to the caller.
//!
//! Runtime races against a concurrent shutdown are **not** errors: submitting
//! to a stopped fiber, or a timer firing after it was cancelled, resolve to a
//! silent no-op. Failures raised by actions are contained by the executor
//! (see [`Execute`](crate::Execute)) and never reach the fiber.
//!
//! [`FiberError`] provides helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

use crate::core::ExecutionState;

/// # Errors produced by fiberkit.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FiberError {
    /// A lifecycle operation was attempted from a state that does not allow it
    /// (e.g. `start()` on a fiber that is already running or stopped).
    #[error("invalid lifecycle transition: fiber is {from}, expected created")]
    InvalidLifecycleTransition {
        /// The state the fiber was in when the transition was attempted.
        from: ExecutionState,
    },

    /// The timing service could not be created or located.
    #[error("timer service unavailable: {reason}")]
    TimerService {
        /// Why the service is unavailable.
        reason: String,
    },

    /// A dedicated execution thread could not be spawned.
    #[error("failed to spawn thread {name:?}: {source}")]
    ThreadSpawn {
        /// The requested thread name.
        name: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

impl FiberError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fiberkit::{ExecutionState, FiberError};
    ///
    /// let err = FiberError::InvalidLifecycleTransition { from: ExecutionState::Running };
    /// assert_eq!(err.as_label(), "fiber_invalid_transition");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FiberError::InvalidLifecycleTransition { .. } => "fiber_invalid_transition",
            FiberError::TimerService { .. } => "fiber_timer_service",
            FiberError::ThreadSpawn { .. } => "fiber_thread_spawn",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            FiberError::InvalidLifecycleTransition { from } => {
                format!("cannot start: state={from}")
            }
            FiberError::TimerService { reason } => format!("timer service: {reason}"),
            FiberError::ThreadSpawn { name, source } => {
                format!("thread spawn failed: name={name} error={source}")
            }
        }
    }

    /// Indicates whether the error is a lifecycle contract violation.
    ///
    /// Such errors point at a programming mistake in the caller rather than
    /// an environmental failure.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, FiberError::InvalidLifecycleTransition { .. })
    }
}
