//! # Change Notification
//!
//! Address-keyed publish/subscribe for "something changed, re-query".
//!
//! ## Delivery Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Event address  →  Who receives it                       │
//! │                                                                         │
//! │  inventory      ──► subscribers of inventory                           │
//! │                 ──► subscribers of every inventory/<id>                │
//! │                                                                         │
//! │  inventory/7    ──► subscribers of inventory/7                         │
//! │                 ──► subscribers of inventory registered with           │
//! │                     descendants = true                                  │
//! │                                                                         │
//! │  Lagging subscriber (buffer overrun)                                   │
//! │                 ──► one synthesized Resync on inventory                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are published after the write commits and before the mutating
//! call returns. Publishing with nobody listening is fine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use stockroom_core::Address;

// =============================================================================
// Events
// =============================================================================

/// What happened at the event's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
    /// Events were dropped for this subscriber; re-query everything.
    Resync,
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub address: Address,
    pub kind: ChangeKind,
    /// Rows affected by the write.
    pub rows: u64,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(address: Address, kind: ChangeKind, rows: u64) -> Self {
        ChangeEvent {
            address,
            kind,
            rows,
            at: Utc::now(),
        }
    }

    fn resync() -> Self {
        ChangeEvent::new(Address::Collection, ChangeKind::Resync, 0)
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Fan-out hub for change events. Clones share one channel.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    /// `capacity` is how many events a slow subscriber may fall behind.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        ChangeNotifier { tx }
    }

    /// Publishes an event. Returns how many receivers the event was queued
    /// for, including subscriptions whose address filter will skip it.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        debug!(address = %event.address, kind = ?event.kind, rows = event.rows, "Publishing change");
        // Err only means there are no receivers
        self.tx.send(event).unwrap_or(0)
    }

    pub fn notify(&self, address: Address, kind: ChangeKind, rows: u64) -> usize {
        self.publish(ChangeEvent::new(address, kind, rows))
    }

    /// Registers interest in `address`.
    ///
    /// With `descendants`, a collection subscription also receives item
    /// events. It has no effect on item subscriptions.
    pub fn subscribe(&self, address: Address, descendants: bool) -> Subscription {
        Subscription {
            address,
            descendants,
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        ChangeNotifier::new(256)
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// One subscriber's filtered view of the event stream.
#[derive(Debug)]
pub struct Subscription {
    address: Address,
    descendants: bool,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn address(&self) -> Address {
        self.address
    }

    /// True if this subscription should see `event`.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match (self.address, event.address) {
            (Address::Collection, Address::Collection) => true,
            (Address::Item(ours), Address::Item(theirs)) => ours == theirs,
            (Address::Item(_), Address::Collection) => true,
            (Address::Collection, Address::Item(_)) => self.descendants,
        }
    }

    /// Waits for the next matching event. `None` once the notifier is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Some(self.lagged(skipped));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns a pending matching event without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    return Some(self.lagged(skipped));
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return None,
            }
        }
    }

    fn lagged(&self, skipped: u64) -> ChangeEvent {
        warn!(
            address = %self.address,
            skipped,
            "Subscriber lagged behind; sending resync"
        );
        ChangeEvent::resync()
    }

    /// Drains every pending matching event.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ProductId;

    fn item(id: i64) -> Address {
        Address::Item(ProductId::new(id).unwrap())
    }

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let notifier = ChangeNotifier::new(4);
        assert_eq!(notifier.notify(Address::Collection, ChangeKind::Inserted, 1), 0);
    }

    #[test]
    fn test_item_subscriber_sees_own_item_and_collection() {
        let notifier = ChangeNotifier::new(16);
        let mut sub = notifier.subscribe(item(7), false);

        notifier.notify(item(8), ChangeKind::Updated, 1);
        notifier.notify(item(7), ChangeKind::Updated, 1);
        notifier.notify(Address::Collection, ChangeKind::Deleted, 3);

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].address, item(7));
        assert_eq!(events[1].kind, ChangeKind::Deleted);
    }

    #[test]
    fn test_collection_subscriber_descendants() {
        let notifier = ChangeNotifier::new(16);
        let mut shallow = notifier.subscribe(Address::Collection, false);
        let mut deep = notifier.subscribe(Address::Collection, true);

        notifier.notify(item(1), ChangeKind::Updated, 1);
        notifier.notify(Address::Collection, ChangeKind::Updated, 1);

        assert_eq!(shallow.drain().len(), 1);
        assert_eq!(deep.drain().len(), 2);
    }

    #[test]
    fn test_lagged_subscriber_gets_resync() {
        let notifier = ChangeNotifier::new(2);
        let mut sub = notifier.subscribe(Address::Collection, false);

        for _ in 0..5 {
            notifier.notify(Address::Collection, ChangeKind::Inserted, 1);
        }

        let first = sub.try_recv().unwrap();
        assert_eq!(first.kind, ChangeKind::Resync);
        assert_eq!(first.address, Address::Collection);
    }

    #[tokio::test]
    async fn test_recv_waits_for_matching_event() {
        let notifier = ChangeNotifier::new(16);
        let mut sub = notifier.subscribe(item(3), false);

        let publisher = notifier.clone();
        tokio::spawn(async move {
            publisher.notify(item(4), ChangeKind::Updated, 1);
            publisher.notify(item(3), ChangeKind::Updated, 1);
        });

        let event = sub.recv().await.unwrap();
        assert_eq!(event.address, item(3));
    }

    #[test]
    fn test_event_json_shape() {
        let event = ChangeEvent::new(item(7), ChangeKind::Updated, 1);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "updated");
        assert_eq!(json["rows"], 1);
        assert_eq!(json["address"]["item"], 7);
    }

    #[tokio::test]
    async fn test_recv_ends_when_notifier_dropped() {
        let notifier = ChangeNotifier::new(4);
        let mut sub = notifier.subscribe(Address::Collection, false);
        drop(notifier);
        assert!(sub.recv().await.is_none());
    }
}
