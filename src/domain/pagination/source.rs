//! Page source port

use async_trait::async_trait;

use super::Pagination;
use crate::domain::FetchError;

/// External collaborator that serves pages of records.
///
/// Implementations are expected to be idempotent for the same
/// `(page, page_size)` as long as the underlying records do not change.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn get_page(&self, page: u32, page_size: u32) -> Result<Pagination<Vec<T>>, FetchError>;
}
