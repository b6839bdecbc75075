//! # LogWriter: simple event printer
//!
//! A minimal observer that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [fiber-started] fiber="ui" flushed=2
//! [action-panicked] err="index out of bounds"
//! [batch-aborted] skipped=3 err="boom"
//! [timer-cancelled] fiber="ui" period=5ms
//! [actions-dropped] fiber="ui" count=1
//! [subscriptions-disposed] fiber="ui" count=4
//! [fiber-stopped] fiber="ui" discarded=0
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn field<T: std::fmt::Display>(v: &Option<T>) -> String {
    v.as_ref()
        .map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let fiber = field(&e.fiber);
        match e.kind {
            EventKind::FiberStarted => {
                println!("[fiber-started] fiber={fiber:?} flushed={}", field(&e.count));
            }
            EventKind::FiberStopped => {
                println!("[fiber-stopped] fiber={fiber:?} discarded={}", field(&e.count));
            }
            EventKind::ActionsDropped => {
                println!("[actions-dropped] fiber={fiber:?} count={}", field(&e.count));
            }
            EventKind::ActionPanicked => {
                println!("[action-panicked] err={:?}", field(&e.error));
            }
            EventKind::BatchAborted => {
                println!(
                    "[batch-aborted] skipped={} err={:?}",
                    field(&e.count),
                    field(&e.error)
                );
            }
            EventKind::TimerCancelled => {
                println!("[timer-cancelled] fiber={fiber:?} period={:?}", e.delay);
            }
            EventKind::SubscriptionsDisposed => {
                println!(
                    "[subscriptions-disposed] fiber={fiber:?} count={}",
                    field(&e.count)
                );
            }
            EventKind::TeardownPanicked => {
                println!(
                    "[teardown-panicked] fiber={fiber:?} err={:?}",
                    field(&e.error)
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
