//! # Event bus for broadcasting runtime events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from many agents at once.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Subscriber (one):
//!   Teller 1   ──┐
//!   Customer 7 ──┼──────► Bus ───────► bank listener ────► AliveTracker
//!   Customer N ──┤  (broadcast chan)                  └──► SubscriberSet
//!   Bank       ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Single total order**: the channel serializes concurrent sends, so the listener
//!   observes one interleaving of all agents' events.
//! - **Bounded capacity**: a lagging listener gets `RecvError::Lagged(n)` and skips `n` items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped (this function still returns immediately).
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// A receiver only gets events **sent after** it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receiver_sees_events_in_publish_order() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::TellerReady).with_teller(0));
        bus.publish(Event::new(EventKind::BankOpen));

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TellerReady);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::BankOpen);
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::BankOpen));
    }
}
