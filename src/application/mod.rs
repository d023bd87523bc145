//! Application layer: the page fetch orchestrator and the release monitor

pub mod fetch;
pub mod services;

pub use fetch::{FetchFailure, FetchHandle, FetchOutcome, FetchSnapshot, FetchState, PageFetcher};
pub use services::{ReleaseCache, ReleaseMonitor, UpdateStatus};
