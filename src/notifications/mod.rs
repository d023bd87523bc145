//! Notifications module
//!
//! In-process pub/sub for fetch state changes and release checks.
//!
//! # Usage
//! ```ignore
//! use netbird_dash::notifications::{EventBus, ReleaseCheckFailedEvent};
//!
//! let bus = EventBus::new();
//! let mut subscriber = bus.subscribe();
//!
//! bus.publish(ReleaseCheckFailedEvent {
//!     reason: "release service unreachable".to_string(),
//! });
//! ```

pub mod event_bus;
pub mod events;

pub use event_bus::{EventBus, EventSubscriber};
pub use events::*;
