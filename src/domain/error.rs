//! Domain errors

use thiserror::Error;

use super::pagination::InvariantViolation;
use super::release::ParseError;

/// Failure reported by an external data source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Source error: {0}")]
    Source(String),
}

impl FetchError {
    /// Whether the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(FetchError::Network("connection reset".into()).is_transient());
        assert!(FetchError::Timeout.is_transient());
        assert!(!FetchError::MalformedPayload("eof".into()).is_transient());
        assert!(!FetchError::Source("500".into()).is_transient());
    }

    #[test]
    fn conversions_keep_the_cause() {
        let err: DomainError = InvariantViolation::ZeroPageSize.into();
        assert_eq!(err.to_string(), "Invariant violation: page size must be at least 1");

        let err: DomainError = FetchError::Timeout.into();
        assert_eq!(err, DomainError::Fetch(FetchError::Timeout));
    }
}
