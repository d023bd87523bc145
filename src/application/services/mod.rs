pub mod release_monitor;

pub use release_monitor::{ReleaseCache, ReleaseMonitor, ReleaseMonitorConfig, UpdateStatus};
