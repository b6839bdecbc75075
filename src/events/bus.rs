//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from multiple sources (fibers, executors,
//! subscription registries).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                   Consumers:
//!   Fiber ─────────┐
//!   Executor ──────┼──────► Bus ───────► observer listener ────► ObserverSet
//!   Subscriptions ─┤  (broadcast chan)   (spawned by FiberBuilder)
//!   Timer ─────────┘                  └─► any receiver from Bus::subscribe()
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and needs no runtime.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// A receiver only gets events **sent after** it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::FiberStarted));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn receivers_see_events_after_subscribe() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::FiberStarted));
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::FiberStopped).with_count(2));

        let ev = rx.try_recv().expect("event");
        assert_eq!(ev.kind, EventKind::FiberStopped);
        assert_eq!(ev.count, Some(2));
        assert!(rx.try_recv().is_err());
    }
}
