//! Fetch state machine values

use crate::domain::{DomainError, FetchError, PaginationParams, Pagination};

/// The `(page, page_size)` a fetch was issued for
pub type PageRequest = PaginationParams;

/// Why a fetch ended in [`FetchState::Failed`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub request: PageRequest,
    /// Sentence suitable for showing to a user
    pub reason: String,
    /// Underlying error, for logs and diagnostics
    pub error: DomainError,
}

impl FetchFailure {
    pub fn new(request: PageRequest, error: DomainError) -> Self {
        let page = request.page;
        let reason = match &error {
            DomainError::Fetch(FetchError::Network(_)) => {
                format!("Could not reach the data source while loading page {page}.")
            }
            DomainError::Fetch(FetchError::Timeout) => {
                format!("The data source took too long to answer for page {page}.")
            }
            DomainError::Fetch(FetchError::MalformedPayload(_)) => {
                format!("The data source sent an unreadable response for page {page}.")
            }
            DomainError::Fetch(FetchError::Source(_)) => {
                format!("The data source reported an error while loading page {page}.")
            }
            DomainError::InvariantViolation(_) => {
                format!("The data source returned inconsistent paging information for page {page}.")
            }
            DomainError::Parse(_) => {
                format!("Page {page} contained a value that could not be understood.")
            }
        };

        Self {
            request,
            reason,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested yet
    Idle,
    /// A request is in flight; the loading indicator is shown
    Loading { page: u32, page_size: u32 },
    /// The newest request produced a valid page
    Loaded(Pagination<Vec<T>>),
    /// The newest request failed
    Failed(FetchFailure),
}

impl<T> FetchState<T> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn page(&self) -> Option<&Pagination<Vec<T>>> {
        match self {
            Self::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Contents of the fetcher's state slot
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSnapshot<T> {
    /// Id of the newest request, 0 before the first one
    pub request_id: u64,
    /// Parameters of the newest request
    pub request: Option<PageRequest>,
    pub state: FetchState<T>,
}

impl<T> FetchSnapshot<T> {
    pub fn idle() -> Self {
        Self {
            request_id: 0,
            request: None,
            state: FetchState::Idle,
        }
    }
}

impl<T> Default for FetchSnapshot<T> {
    fn default() -> Self {
        Self::idle()
    }
}
