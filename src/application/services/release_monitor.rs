//! Release Monitor Service
//!
//! Periodically asks a [`ReleaseSource`] for the latest release, keeps the
//! last good answer in an explicitly owned [`ReleaseCache`], and announces
//! newer versions on the event bus.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::domain::{DomainError, DomainResult, NetbirdRelease, ReleaseSource, Version};
use crate::notifications::{EventBus, ReleaseCheckFailedEvent, UpdateAvailableEvent};
use crate::shared::ShutdownSignal;

/// Last release snapshot received from the release check.
///
/// Created by the caller and shared by `Arc`; starts empty.
#[derive(Debug, Default)]
pub struct ReleaseCache {
    release: RwLock<Option<NetbirdRelease>>,
}

impl ReleaseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub async fn get(&self) -> Option<NetbirdRelease> {
        self.release.read().await.clone()
    }

    /// Replace the snapshot, returning the previous one.
    pub async fn store(&self, release: NetbirdRelease) -> Option<NetbirdRelease> {
        self.release.write().await.replace(release)
    }

    pub async fn clear(&self) {
        *self.release.write().await = None;
    }
}

/// Shortest interval the monitor will tick at
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for release monitoring
#[derive(Debug, Clone)]
pub struct ReleaseMonitorConfig {
    /// How often to ask the release source. Raised to
    /// [`MIN_CHECK_INTERVAL`] when shorter.
    pub check_interval: Duration,
}

impl Default for ReleaseMonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(6 * 60 * 60),
        }
    }
}

/// Result of comparing the running version against the latest release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    pub current: Version,
    pub latest: Version,
    pub url: String,
    pub checked_at: DateTime<Utc>,
    pub update_available: bool,
}

impl UpdateStatus {
    pub fn from_release(current: Version, release: &NetbirdRelease) -> DomainResult<Self> {
        let latest = release.latest()?;
        Ok(Self {
            current,
            latest,
            url: release.url.clone(),
            checked_at: release.last_checked,
            update_available: latest > current,
        })
    }
}

/// Release Monitor Service
pub struct ReleaseMonitor {
    source: Arc<dyn ReleaseSource>,
    current: Version,
    cache: Arc<ReleaseCache>,
    event_bus: EventBus,
    config: ReleaseMonitorConfig,
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the monitor task ends, including by panic.
struct RunningGuard(Arc<AtomicBool>);

impl RunningGuard {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ReleaseMonitor {
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        current: Version,
        cache: Arc<ReleaseCache>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            source,
            current,
            cache,
            event_bus,
            config: ReleaseMonitorConfig::default(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_config(mut self, config: ReleaseMonitorConfig) -> Self {
        if config.check_interval < MIN_CHECK_INTERVAL {
            warn!(
                "Check interval {:?} too short, using {:?}",
                config.check_interval, MIN_CHECK_INTERVAL
            );
        }
        self.config = ReleaseMonitorConfig {
            check_interval: config.check_interval.max(MIN_CHECK_INTERVAL),
        };
        self
    }

    pub fn current_version(&self) -> Version {
        self.current
    }

    /// Fetch the latest release now and compare it with the running version.
    ///
    /// Only releases whose version parses are cached. An update event is
    /// published the first time a given newer version is seen.
    pub async fn check_now(&self) -> DomainResult<UpdateStatus> {
        let release = match self.source.latest_release().await {
            Ok(release) => release,
            Err(e) => return Err(self.report_failure(e.into())),
        };

        let status = match UpdateStatus::from_release(self.current, &release) {
            Ok(status) => status,
            Err(e) => return Err(self.report_failure(e)),
        };

        let previous = self.cache.store(release).await;
        let already_seen = previous
            .and_then(|p| p.latest().ok())
            .is_some_and(|v| v == status.latest);

        if status.update_available {
            if already_seen {
                debug!("Update {} already announced", status.latest);
            } else {
                info!(
                    "Update available: {} -> {} ({})",
                    status.current, status.latest, status.url
                );
                self.event_bus.publish(UpdateAvailableEvent {
                    current_version: status.current.to_string(),
                    latest_version: status.latest.to_string(),
                    url: status.url.clone(),
                });
            }
        } else {
            debug!("Running {} is up to date (latest {})", status.current, status.latest);
        }

        Ok(status)
    }

    /// Status derived from the cached snapshot, without contacting the source.
    pub async fn cached_status(&self) -> Option<DomainResult<UpdateStatus>> {
        let release = self.cache.get().await?;
        Some(UpdateStatus::from_release(self.current, &release))
    }

    /// Start the monitor background task. The first check runs immediately.
    ///
    /// [`is_running`](Self::is_running) is true from this call until the task
    /// ends, however it ends.
    pub fn start(self: &Arc<Self>, shutdown: ShutdownSignal) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        let running = RunningGuard::raise(&self.running);

        tokio::spawn(async move {
            let _running = running;
            info!(
                "Release monitor started (running {}, check interval: {:?})",
                monitor.current, monitor.config.check_interval
            );

            let mut interval = tokio::time::interval(monitor.config.check_interval);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        // failures are already logged and published
                        let _ = monitor.check_now().await;
                    }
                    _ = shutdown.wait() => {
                        info!("Release monitor shutting down");
                        break;
                    }
                }
            }

            info!("Release monitor stopped");
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn report_failure(&self, error: DomainError) -> DomainError {
        warn!("Release check failed: {}", error);
        self.event_bus.publish(ReleaseCheckFailedEvent {
            reason: error.to_string(),
        });
        error
    }
}
