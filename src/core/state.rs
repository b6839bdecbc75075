//! # Fiber lifecycle state.
//!
//! ```text
//!   Created ──start()──► Running ──stop()──► Stopped
//!      └─────────────────stop()────────────────┘
//! ```
//! `Stopped` is terminal. Internally a fourth phase, `Starting`, covers the
//! start-up flush. Submissions seen during `Starting` are still buffered;
//! the phase is reported as [`ExecutionState::Running`].

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Public lifecycle state of a fiber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    /// Accepting work into the pending buffer; nothing runs yet.
    Created,
    /// Forwarding work to the thread adapter.
    Running,
    /// Terminal; all submissions are dropped.
    Stopped,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecutionState::Created => "created",
            ExecutionState::Running => "running",
            ExecutionState::Stopped => "stopped",
        })
    }
}

/// Internal phase, including the transient start-up flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Phase {
    Created = 0,
    Starting = 1,
    Running = 2,
    Stopped = 3,
}

impl Phase {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Phase::Created,
            1 => Phase::Starting,
            2 => Phase::Running,
            _ => Phase::Stopped,
        }
    }

    pub(crate) fn public(self) -> ExecutionState {
        match self {
            Phase::Created => ExecutionState::Created,
            Phase::Starting | Phase::Running => ExecutionState::Running,
            Phase::Stopped => ExecutionState::Stopped,
        }
    }
}

/// Lock-free cell holding the current [`Phase`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(Phase::Created as u8))
    }

    #[inline]
    pub(crate) fn load(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Stores `to` and returns the previous phase.
    #[inline]
    pub(crate) fn swap(&self, to: Phase) -> Phase {
        Phase::from_u8(self.0.swap(to as u8, Ordering::AcqRel))
    }

    /// Moves `from → to`; returns `false` if the phase was not `from`.
    #[inline]
    pub(crate) fn transition(&self, from: Phase, to: Phase) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_reads_as_running() {
        assert_eq!(Phase::Starting.public(), ExecutionState::Running);
        assert_eq!(Phase::Created.public(), ExecutionState::Created);
    }

    #[test]
    fn transitions() {
        let cell = StateCell::new();
        assert_eq!(cell.load(), Phase::Created);
        assert!(cell.transition(Phase::Created, Phase::Starting));
        assert!(!cell.transition(Phase::Created, Phase::Starting));
        assert_eq!(cell.swap(Phase::Stopped), Phase::Starting);
        assert!(!cell.transition(Phase::Starting, Phase::Running));
        assert_eq!(cell.load().public(), ExecutionState::Stopped);
    }

    #[test]
    fn display() {
        assert_eq!(ExecutionState::Running.to_string(), "running");
    }
}
