//! Callback registry
//!
//! Manages the set of event subscribers registered against a player
//! session and delivers broadcasts to all of them. Each registration gets
//! its own slot, so a remote endpoint that registers twice holds two
//! delivery slots and unregisters them one at a time.
//!
//! Delivery is a non-blocking push into the subscriber's channel; the
//! transport side drains the channel toward the remote peer. A push that
//! fails means the receiving half is gone (peer disconnected or crashed):
//! the slot is dropped from the registry and delivery continues to the
//! remaining subscribers.
//!
//! The registry has its own mutex with no ordering dependency on the
//! session lock; registry calls never take the session lock.

use headunit_common::events::PlayerEvent;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Channel half handed over at registration; events are pushed into it
pub type EventSender = mpsc::UnboundedSender<PlayerEvent>;

struct Subscriber {
    id: Uuid,
    tx: EventSender,
}

#[derive(Default)]
struct RegistryInner {
    subscribers: Vec<Subscriber>,
    closed: bool,
}

/// Registry of live event subscribers
#[derive(Default)]
pub struct CallbackRegistry {
    inner: Mutex<RegistryInner>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber slot and return its registration token.
    ///
    /// After `close`, the sender is dropped immediately and the returned
    /// token refers to nothing.
    pub fn register(&self, tx: EventSender) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            debug!(subscriber = %id, "registry closed, registration ignored");
            return id;
        }
        inner.subscribers.push(Subscriber { id, tx });
        debug!(subscriber = %id, total = inner.subscribers.len(), "callback registered");
        id
    }

    /// Remove the slot matching `id`. Returns false (not an error) if absent.
    pub fn unregister(&self, id: Uuid) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.subscribers.iter().position(|s| s.id == id) {
            Some(index) => {
                inner.subscribers.remove(index);
                debug!(subscriber = %id, total = inner.subscribers.len(), "callback unregistered");
                true
            }
            None => {
                debug!(subscriber = %id, "unregister ignored, unknown subscriber");
                false
            }
        }
    }

    /// Deliver `event` to every registered subscriber, in registration order.
    ///
    /// Unreachable subscribers are dropped from the registry without
    /// aborting delivery to the rest. Returns the number of successful
    /// deliveries.
    pub fn broadcast(&self, event: &PlayerEvent) -> usize {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            return 0;
        }
        let mut delivered = 0;
        inner.subscribers.retain(|subscriber| {
            match subscriber.tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    warn!(subscriber = %subscriber.id, "dropping unreachable event subscriber");
                    false
                }
            }
        });
        debug!(event = event.event_type(), delivered, "event broadcast");
        delivered
    }

    /// Number of currently registered subscribers
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all subscribers and turn subsequent operations into no-ops.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        let dropped = inner.subscribers.len();
        inner.subscribers.clear();
        inner.closed = true;
        debug!(dropped, "callback registry closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (EventSender, mpsc::UnboundedReceiver<PlayerEvent>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn broadcast_reaches_every_subscriber() {
        let registry = CallbackRegistry::new();
        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();
        registry.register(tx_a);
        registry.register(tx_b);

        assert_eq!(registry.broadcast(&PlayerEvent::stopped()), 2);
        assert_eq!(rx_a.try_recv().unwrap().event_type(), "Stopped");
        assert_eq!(rx_b.try_recv().unwrap().event_type(), "Stopped");
    }

    #[test]
    fn duplicate_registration_gets_two_slots() {
        let registry = CallbackRegistry::new();
        let (tx, mut rx) = channel();
        let first = registry.register(tx.clone());
        let _second = registry.register(tx);
        assert_eq!(registry.len(), 2);

        registry.broadcast(&PlayerEvent::paused());
        assert_eq!(rx.try_recv().unwrap().event_type(), "Paused");
        assert_eq!(rx.try_recv().unwrap().event_type(), "Paused");
        assert!(rx.try_recv().is_err());

        // one unregister removes exactly one slot
        assert!(registry.unregister(first));
        registry.broadcast(&PlayerEvent::paused());
        assert_eq!(rx.try_recv().unwrap().event_type(), "Paused");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unregister_absent_subscriber_is_a_noop() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unregister(Uuid::new_v4()));
    }

    #[test]
    fn dead_subscriber_is_pruned_without_aborting_broadcast() {
        let registry = CallbackRegistry::new();
        let (tx_dead, rx_dead) = channel();
        let (tx_live, mut rx_live) = channel();
        registry.register(tx_dead);
        registry.register(tx_live);
        drop(rx_dead);

        assert_eq!(registry.broadcast(&PlayerEvent::completed()), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(rx_live.try_recv().unwrap().event_type(), "Completed");

        // pruned subscriber gets nothing on subsequent broadcasts
        assert_eq!(registry.broadcast(&PlayerEvent::stopped()), 1);
    }

    #[test]
    fn events_arrive_in_broadcast_order() {
        let registry = CallbackRegistry::new();
        let (tx, mut rx) = channel();
        registry.register(tx);

        registry.broadcast(&PlayerEvent::started(1_000));
        registry.broadcast(&PlayerEvent::paused());
        registry.broadcast(&PlayerEvent::stopped());

        assert_eq!(rx.try_recv().unwrap().event_type(), "Started");
        assert_eq!(rx.try_recv().unwrap().event_type(), "Paused");
        assert_eq!(rx.try_recv().unwrap().event_type(), "Stopped");
    }

    #[test]
    fn close_clears_and_disables_the_registry() {
        let registry = CallbackRegistry::new();
        let (tx, mut rx) = channel();
        registry.register(tx.clone());
        registry.close();

        assert_eq!(registry.len(), 0);
        assert_eq!(registry.broadcast(&PlayerEvent::stopped()), 0);
        assert!(rx.try_recv().is_err());

        // registration after close is accepted but inert
        registry.register(tx);
        assert_eq!(registry.len(), 0);
    }
}
