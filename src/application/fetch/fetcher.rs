//! Page fetcher
//!
//! [`PageFetcher`] owns the single state slot for one consumer. Each call to
//! [`PageFetcher::fetch_page`] gets a new request id and spawns the source
//! call; when that call resolves, its result is written only if no newer
//! request has been issued in the meantime (cancel-and-replace).
//!
//! The id check and the state write happen inside one
//! `watch::Sender::send_if_modified` call, so they cannot interleave with a
//! new `fetch_page`. State change events are published under the same lock,
//! so bus subscribers see them in slot order.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::{FetchFailure, FetchSnapshot, FetchState, PageRequest};
use crate::domain::{DomainResult, FetchError, PageSource, Pagination};
use crate::notifications::{EventBus, FetchStateChangedEvent};
use crate::shared::{retry_with_backoff, RetryConfig};

/// What happened to a request's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result became the current state
    Applied,
    /// A newer request had been issued; the result was dropped
    Discarded,
}

/// Handle to an issued request.
///
/// Dropping the handle does not cancel the request.
#[derive(Debug)]
pub struct FetchHandle {
    request_id: u64,
    task: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Wait for the request to resolve.
    pub async fn outcome(self) -> FetchOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(request_id = self.request_id, error = %e, "Fetch task did not complete");
                FetchOutcome::Discarded
            }
        }
    }
}

/// Orchestrates paginated fetches against a [`PageSource`]
pub struct PageFetcher<T> {
    source: Arc<dyn PageSource<T>>,
    slot: Arc<watch::Sender<FetchSnapshot<T>>>,
    retry: RetryConfig,
    event_bus: Option<EventBus>,
}

impl<T> PageFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn PageSource<T>>) -> Self {
        let (slot, _) = watch::channel(FetchSnapshot::idle());
        Self {
            source,
            slot: Arc::new(slot),
            retry: RetryConfig::none(),
            event_bus: None,
        }
    }

    /// Retry transient source errors before reporting `Failed`.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Publish every state transition on the given bus.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Request a page, superseding any request still in flight.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_page(&self, page: u32, page_size: u32) -> FetchHandle {
        let request = PageRequest::new(page, page_size);
        let mut request_id = 0;
        self.slot.send_modify(|snapshot| {
            snapshot.request_id += 1;
            request_id = snapshot.request_id;
            snapshot.request = Some(request);
            snapshot.state = FetchState::Loading { page, page_size };
            publish_state(self.event_bus.as_ref(), snapshot);
        });

        debug!(request_id, page, page_size, "Page fetch issued");

        let source = self.source.clone();
        let slot = self.slot.clone();
        let retry = self.retry.clone();
        let event_bus = self.event_bus.clone();

        let task = tokio::spawn(async move {
            let result = AssertUnwindSafe(load(source.as_ref(), request, retry))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(FetchError::Source("data source panicked".into()).into()));

            settle(&slot, event_bus.as_ref(), request_id, request, result)
        });

        FetchHandle { request_id, task }
    }

    /// Re-issue the most recent request. `None` if nothing was requested yet.
    pub fn retry(&self) -> Option<FetchHandle> {
        let request = self.slot.borrow().request;
        request.map(|r| {
            info!(page = r.page, page_size = r.page_size, "Retrying page fetch");
            self.fetch_page(r.page, r.page_size)
        })
    }

    /// Current state.
    pub fn state(&self) -> FetchState<T> {
        self.slot.borrow().state.clone()
    }

    pub fn snapshot(&self) -> FetchSnapshot<T> {
        self.slot.borrow().clone()
    }

    /// Read-only view of the state slot; changes are observed with
    /// `changed()` / `wait_for()`.
    pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot<T>> {
        self.slot.subscribe()
    }

    /// Wait until the newest request has left `Loading`.
    pub async fn settled(&self) -> FetchSnapshot<T> {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(|snapshot| !snapshot.state.is_loading())
            .await
            .map(|snapshot| snapshot.clone());
        // The sender lives in `self`, so the channel cannot be closed here
        settled.unwrap_or_else(|_| self.snapshot())
    }
}

async fn load<T>(
    source: &dyn PageSource<T>,
    request: PageRequest,
    retry: RetryConfig,
) -> DomainResult<Pagination<Vec<T>>> {
    let page = retry_with_backoff(
        retry,
        || source.get_page(request.page, request.page_size),
        FetchError::is_transient,
        "fetch_page",
    )
    .await?;

    page.validate_records()?;
    page.matches(request)?;
    Ok(page)
}

fn settle<T>(
    slot: &watch::Sender<FetchSnapshot<T>>,
    event_bus: Option<&EventBus>,
    request_id: u64,
    request: PageRequest,
    result: DomainResult<Pagination<Vec<T>>>,
) -> FetchOutcome {
    let error_text = result.as_ref().err().map(ToString::to_string);
    let mut records = 0;

    let applied = slot.send_if_modified(|snapshot| {
        if snapshot.request_id != request_id {
            return false;
        }
        snapshot.state = match result {
            Ok(page) => {
                records = page.data.len();
                FetchState::Loaded(page)
            }
            Err(error) => FetchState::Failed(FetchFailure::new(request, error)),
        };
        publish_state(event_bus, snapshot);
        true
    });

    if !applied {
        debug!(request_id, page = request.page, "Discarding result of superseded request");
        return FetchOutcome::Discarded;
    }

    match error_text {
        None => info!(request_id, page = request.page, records, "Page loaded"),
        Some(error) => warn!(request_id, page = request.page, error = %error, "Page fetch failed"),
    }

    FetchOutcome::Applied
}

/// Called with the slot locked.
fn publish_state<T>(event_bus: Option<&EventBus>, snapshot: &FetchSnapshot<T>) {
    if let Some(bus) = event_bus {
        bus.publish(FetchStateChangedEvent {
            request_id: snapshot.request_id,
            state: snapshot.state.label().to_string(),
            page: snapshot.request.map(|r| r.page),
        });
    }
}
