//! # ObserverSet: non-blocking fan-out over multiple observers
//!
//! [`ObserverSet`] distributes each [`Event`] to multiple observers
//! **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-observer FIFO (queue order).
//! - Panics inside observers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different observers.
//! - No retries on per-observer queue overflow (events are dropped for that
//!   observer).
//!
//! ## Diagram
//! ```text
//!    Bus ──► listen() ──► emit(&Event)
//!                            │               (Arc-clone per observer)
//!                            ├──────────► [queue O1] ─► worker O1 ─► on_event()
//!                            ├──────────► [queue O2] ─► worker O2 ─► on_event()
//!                            └──────────► [queue ON] ─► worker ON ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};

use crate::actions::panic_message;
use crate::events::{Bus, Event};
use crate::timer::TimerService;

use super::Observe;

/// Per-observer channel with metadata
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-observer bounded queues and worker tasks.
pub struct ObserverSet {
    channels: Vec<ObserverChannel>,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker per observer on `service`.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>, service: &TimerService) -> Self {
        let mut channels = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().max(1);
            let name = obs.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            service.spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = obs.on_event(ev.as_ref());
                    if let Err(p) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        eprintln!(
                            "[fiberkit] observer '{}' panicked: {}",
                            obs.name(),
                            panic_message(p.as_ref())
                        );
                    }
                }
            });

            channels.push(ObserverChannel { name, sender: tx });
        }

        Self { channels }
    }

    /// Fan-out one event to all observers (non-blocking).
    ///
    /// If an observer's queue is **full** or **closed**, the event is dropped for it
    /// and a warning is logged with the observer's name.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    eprintln!(
                        "[fiberkit] observer '{}' dropped event: queue full",
                        channel.name
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    eprintln!(
                        "[fiberkit] observer '{}' dropped event: worker closed",
                        channel.name
                    );
                }
            }
        }
    }

    /// Subscribes to `bus` and forwards every event to this set until the
    /// bus closes.
    pub fn listen(self: Arc<Self>, bus: &Bus, service: &TimerService) {
        let mut rx = bus.subscribe();
        service.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => self.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        eprintln!("[fiberkit] observer listener lagged: skipped={n}");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Forward(mpsc::UnboundedSender<EventKind>);

    #[async_trait]
    impl Observe for Forward {
        async fn on_event(&self, event: &Event) {
            let _ = self.0.send(event.kind);
        }

        fn name(&self) -> &'static str {
            "forward"
        }
    }

    struct Explodes;

    #[async_trait]
    impl Observe for Explodes {
        async fn on_event(&self, _event: &Event) {
            panic!("observer bug");
        }
    }

    #[tokio::test]
    async fn fans_out_from_bus_in_order() {
        let service = TimerService::current().expect("runtime");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let set = Arc::new(ObserverSet::new(
            vec![Arc::new(Explodes), Arc::new(Forward(tx))],
            &service,
        ));
        assert_eq!(set.len(), 2);

        let bus = Bus::new(16);
        set.listen(&bus, &service);
        assert_eq!(bus.receiver_count(), 1);

        bus.publish(Event::new(EventKind::FiberStarted));
        bus.publish(Event::new(EventKind::FiberStopped));

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(first.ok().flatten(), Some(EventKind::FiberStarted));
        assert_eq!(second.ok().flatten(), Some(EventKind::FiberStopped));
    }

    #[test]
    fn empty_set() {
        let service = TimerService::shared().expect("service");
        let set = ObserverSet::new(Vec::new(), &service);
        assert!(set.is_empty());
        set.emit(&Event::new(EventKind::FiberStarted));
    }
}
