//! NetBird dashboard core
//!
//! Paginated data fetching with a loading/loaded/failed lifecycle, and
//! release version checks against the latest published NetBird build.
//!
//! ```text
//! domain          pagination and release models, source ports, errors
//! application     page fetch state machine, release monitor
//! infrastructure  in-memory and JSON file sources
//! interfaces      terminal rendering
//! notifications   event bus
//! shared          retry and shutdown helpers
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod logging;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use logging::init_tracing;
