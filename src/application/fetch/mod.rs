//! Paginated fetch orchestration
//!
//! ```text
//!            fetch_page              source Ok + valid
//!   Idle ─────────────► Loading ──────────────────────► Loaded
//!                        ▲   │                            │
//!                        │   │ source Err / invalid page  │ fetch_page
//!                        │   ▼                            │
//!                        └─ Failed ◄──────────────────────┘
//!                 retry / fetch_page
//! ```
//!
//! Only the newest request may move the state out of `Loading`; results of
//! superseded requests are dropped when they arrive.

pub mod fetcher;
pub mod state;

pub use fetcher::{FetchHandle, FetchOutcome, PageFetcher};
pub use state::{FetchFailure, FetchSnapshot, FetchState, PageRequest};
