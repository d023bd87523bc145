//! Pagination envelope
//!
//! A [`Pagination`] describes one page of a larger result set. The type is a
//! plain value: building one never checks its consistency, so anything that
//! receives an envelope from outside must call [`Pagination::validate`]
//! before trusting the metadata.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound for the page size accepted from callers
pub const MAX_PAGE_SIZE: u32 = 100;

/// Ways a [`Pagination`] envelope can contradict itself or the request it answers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("page numbers start at 1, got 0")]
    ZeroPage,

    #[error(
        "total_pages is {actual} but {total_records} records at {page_size} per page make {expected}"
    )]
    TotalPagesMismatch {
        actual: u32,
        expected: u64,
        total_records: u64,
        page_size: u32,
    },

    #[error("page {page} is past the last page ({last})")]
    PageOutOfRange { page: u32, last: u32 },

    #[error("page holds {count} records but the page size is {page_size}")]
    TooManyRecords { count: usize, page_size: u32 },

    #[error("requested page {requested} but received page {received}")]
    UnexpectedPage { requested: u32, received: u32 },

    #[error("requested {requested} records per page but received {received}")]
    UnexpectedPageSize { requested: u32, received: u32 },
}

/// Number of pages needed for `total_records` at `page_size` per page.
///
/// A zero page size yields zero pages instead of dividing by zero.
pub fn expected_total_pages(total_records: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_records.div_ceil(u64::from(page_size))
}

/// Page request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Clamp the page to at least 1 and the page size to `1..=max_page_size`.
    pub fn normalize(self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size.max(1)),
        }
    }

    /// Index of the first record on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// One page of a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination<T> {
    /// Payload for the current page
    pub data: T,
    /// Current page (1-based)
    pub page: u32,
    /// Maximum records per page
    pub page_size: u32,
    /// Total number of pages for the query
    pub total_pages: u32,
    /// Total number of records across all pages
    pub total_records: u64,
}

impl<T> Pagination<T> {
    /// Build an envelope, deriving `total_pages` from the record count.
    pub fn new(data: T, page: u32, page_size: u32, total_records: u64) -> Self {
        let total_pages =
            u32::try_from(expected_total_pages(total_records, page_size)).unwrap_or(u32::MAX);
        Self {
            data,
            page,
            page_size,
            total_pages,
            total_records,
        }
    }

    /// Check the envelope's metadata against itself.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.page_size == 0 {
            return Err(InvariantViolation::ZeroPageSize);
        }
        if self.page == 0 {
            return Err(InvariantViolation::ZeroPage);
        }

        let expected = expected_total_pages(self.total_records, self.page_size);
        if u64::from(self.total_pages) != expected {
            return Err(InvariantViolation::TotalPagesMismatch {
                actual: self.total_pages,
                expected,
                total_records: self.total_records,
                page_size: self.page_size,
            });
        }

        let last = self.total_pages.max(1);
        if self.page > last {
            return Err(InvariantViolation::PageOutOfRange {
                page: self.page,
                last,
            });
        }

        Ok(())
    }

    /// Check that this envelope answers the given request.
    pub fn matches(&self, params: PaginationParams) -> Result<(), InvariantViolation> {
        if self.page != params.page {
            return Err(InvariantViolation::UnexpectedPage {
                requested: params.page,
                received: self.page,
            });
        }
        if self.page_size != params.page_size {
            return Err(InvariantViolation::UnexpectedPageSize {
                requested: params.page_size,
                received: self.page_size,
            });
        }
        Ok(())
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Transform the payload, keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Pagination<U>
    where
        F: FnOnce(T) -> U,
    {
        Pagination {
            data: f(self.data),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_records: self.total_records,
        }
    }
}

impl<T> Pagination<Vec<T>> {
    /// Cut one page out of a complete record set.
    ///
    /// A page past the end yields an empty payload; [`Pagination::validate`]
    /// reports it as out of range.
    pub fn from_records(records: &[T], params: PaginationParams) -> Self
    where
        T: Clone,
    {
        let start = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let data = records
            .iter()
            .skip(start)
            .take(params.page_size as usize)
            .cloned()
            .collect();

        Self::new(data, params.page, params.page_size, records.len() as u64)
    }

    /// [`Pagination::validate`] plus a bound on the number of records carried.
    pub fn validate_records(&self) -> Result<(), InvariantViolation> {
        self.validate()?;
        if self.data.len() > self.page_size as usize {
            return Err(InvariantViolation::TooManyRecords {
                count: self.data.len(),
                page_size: self.page_size,
            });
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_computes_total_pages() {
        let page = Pagination::new((), 1, 10, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.validate().is_ok());
    }

    #[test]
    fn exact_multiple_has_no_partial_page() {
        assert_eq!(expected_total_pages(30, 10), 3);
        assert_eq!(expected_total_pages(0, 10), 0);
        assert_eq!(expected_total_pages(1, 10), 1);
    }

    #[test]
    fn wrong_total_pages_is_rejected() {
        let page = Pagination {
            data: (),
            page: 1,
            page_size: 10,
            total_pages: 2,
            total_records: 25,
        };
        assert_eq!(
            page.validate(),
            Err(InvariantViolation::TotalPagesMismatch {
                actual: 2,
                expected: 3,
                total_records: 25,
                page_size: 10,
            })
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let page = Pagination {
            data: (),
            page: 1,
            page_size: 0,
            total_pages: 0,
            total_records: 0,
        };
        assert_eq!(page.validate(), Err(InvariantViolation::ZeroPageSize));
    }

    #[test]
    fn zero_page_is_rejected() {
        let page = Pagination::new((), 0, 10, 5);
        assert_eq!(page.validate(), Err(InvariantViolation::ZeroPage));
    }

    #[test]
    fn empty_result_set_allows_page_one() {
        let page = Pagination::new(Vec::<u32>::new(), 1, 10, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.validate_records().is_ok());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn page_past_the_end_is_rejected() {
        let page = Pagination::new((), 4, 10, 25);
        assert_eq!(
            page.validate(),
            Err(InvariantViolation::PageOutOfRange { page: 4, last: 3 })
        );
    }

    #[test]
    fn from_records_slices_requested_page() {
        let records: Vec<u32> = (1..=25).collect();

        let second = Pagination::from_records(&records, PaginationParams::new(2, 10));
        assert_eq!(second.data, (11..=20).collect::<Vec<_>>());
        assert_eq!(second.total_pages, 3);
        assert!(second.has_next());
        assert!(second.has_previous());

        let last = Pagination::from_records(&records, PaginationParams::new(3, 10));
        assert_eq!(last.data, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_next());
        assert!(last.validate_records().is_ok());
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let page = Pagination::new(vec![1, 2, 3], 1, 2, 3);
        assert_eq!(
            page.validate_records(),
            Err(InvariantViolation::TooManyRecords {
                count: 3,
                page_size: 2,
            })
        );
    }

    #[test]
    fn matches_checks_echoed_request() {
        let page = Pagination::new((), 2, 10, 25);
        assert!(page.matches(PaginationParams::new(2, 10)).is_ok());
        assert_eq!(
            page.matches(PaginationParams::new(1, 10)),
            Err(InvariantViolation::UnexpectedPage {
                requested: 1,
                received: 2,
            })
        );
        assert_eq!(
            page.matches(PaginationParams::new(2, 20)),
            Err(InvariantViolation::UnexpectedPageSize {
                requested: 20,
                received: 10,
            })
        );
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Pagination::new(vec![1, 2], 1, 2, 5).map(|items| items.len());
        assert_eq!(page.data, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_records, 5);
    }

    #[test]
    fn normalize_clamps_bounds() {
        assert_eq!(
            PaginationParams::new(0, 0).normalize(MAX_PAGE_SIZE),
            PaginationParams::new(1, 1)
        );
        assert_eq!(
            PaginationParams::new(3, 500).normalize(MAX_PAGE_SIZE),
            PaginationParams::new(3, 100)
        );
        assert_eq!(PaginationParams::new(2, 10).offset(), 10);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"data":["a","b"],"page":1,"page_size":2,"total_pages":2,"total_records":3}"#;
        let page: Pagination<Vec<String>> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.validate_records().is_ok());
    }
}
