//! In-process event bus
//!
//! The bus is a cheap handle around a broadcast sender: clone it into every
//! component that publishes. Subscribers that fall behind skip the oldest
//! messages and keep a running count of what they missed.

use log::{trace, warn};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::events::{Event, EventMessage};

/// Messages a slow subscriber may fall behind before it starts losing them
const CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Wrap `event` in a timestamped message and deliver it to current
    /// subscribers. Returns how many received it.
    pub fn publish(&self, event: impl Into<Event>) -> usize {
        let message = EventMessage::new(event.into());
        let kind = message.event.event_type();

        let delivered = self.sender.send(message).unwrap_or(0);
        trace!("{} delivered to {} subscriber(s)", kind, delivered);
        delivered
    }

    /// Messages published before this call are not seen.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
            missed: 0,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    missed: u64,
}

impl EventSubscriber {
    /// Next message, or `None` once every bus handle is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Messages dropped because this subscriber fell behind.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    fn lagged(&mut self, skipped: u64) {
        self.missed += skipped;
        warn!("Event subscriber fell behind, {} message(s) dropped", skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::notifications::events::{ReleaseCheckFailedEvent, UpdateAvailableEvent};

    fn failure(reason: &str) -> ReleaseCheckFailedEvent {
        ReleaseCheckFailedEvent {
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        assert_eq!(bus.publish(failure("offline")), 1);

        let message = tokio::time::timeout(Duration::from_millis(100), subscriber.recv())
            .await
            .expect("timed out")
            .expect("bus closed");
        assert_eq!(message.event.event_type(), "release_check_failed");
    }

    #[test]
    fn publishing_without_subscribers_delivers_nothing() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(failure("nobody listens")), 0);
    }

    #[test]
    fn clones_share_one_channel() {
        let bus = EventBus::new();
        let publisher = bus.clone();
        let mut subscriber = bus.subscribe();

        publisher.publish(UpdateAvailableEvent {
            current_version: "0.27.0".into(),
            latest_version: "0.28.4".into(),
            url: "https://example.com/netbird".into(),
        });

        assert_eq!(
            subscriber.try_recv().map(|m| m.event.event_type()),
            Some("update_available")
        );
        assert!(subscriber.try_recv().is_none());
    }

    #[test]
    fn slow_subscriber_counts_dropped_messages() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        for i in 0..CAPACITY + 3 {
            bus.publish(failure(&i.to_string()));
        }

        let first = subscriber.try_recv().expect("newest messages are kept");
        assert_eq!(subscriber.missed(), 3);
        match first.event {
            Event::ReleaseCheckFailed(e) => assert_eq!(e.reason, "3"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn recv_ends_when_bus_is_dropped() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();
        drop(bus);
        assert!(subscriber.recv().await.is_none());
    }
}
