//! Notification events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// The page fetcher moved to a new state
    FetchStateChanged(FetchStateChangedEvent),
    /// A release newer than the running version was found
    UpdateAvailable(UpdateAvailableEvent),
    /// The release check could not be completed
    ReleaseCheckFailed(ReleaseCheckFailedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::FetchStateChanged(_) => "fetch_state_changed",
            Event::UpdateAvailable(_) => "update_available",
            Event::ReleaseCheckFailed(_) => "release_check_failed",
        }
    }
}

/// Published while the fetcher's slot is locked, so per bus these arrive in
/// the same order as the slot changes. `request_id` matches
/// `FetchSnapshot::request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchStateChangedEvent {
    pub request_id: u64,
    /// `idle`, `loading`, `loaded` or `failed`
    pub state: String,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailableEvent {
    pub current_version: String,
    pub latest_version: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseCheckFailedEvent {
    pub reason: String,
}

macro_rules! impl_from_event {
    ($($variant:ident($payload:ty)),* $(,)?) => {
        $(impl From<$payload> for Event {
            fn from(payload: $payload) -> Self {
                Event::$variant(payload)
            }
        })*
    };
}

impl_from_event!(
    FetchStateChanged(FetchStateChangedEvent),
    UpdateAvailable(UpdateAvailableEvent),
    ReleaseCheckFailed(ReleaseCheckFailedEvent),
);

/// Event envelope delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_type_tag() {
        let message = EventMessage::new(Event::UpdateAvailable(UpdateAvailableEvent {
            current_version: "0.27.0".into(),
            latest_version: "0.28.4".into(),
            url: "https://example.com/netbird".into(),
        }));

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "UpdateAvailable");
        assert_eq!(json["data"]["latest_version"], "0.28.4");
        assert!(json["id"].is_string());
    }
}
