//! Core types: pagination envelope, versions and releases, and the ports
//! through which external sources are reached.

pub mod error;
pub mod pagination;
pub mod release;

pub use error::{DomainError, DomainResult, FetchError};
pub use pagination::{
    expected_total_pages, InvariantViolation, PageSource, Pagination, PaginationParams,
};
pub use release::{
    compare_versions, is_update_available, ordering_sign, parse_version, NetbirdRelease,
    ParseError, ReleaseSource, Version,
};
