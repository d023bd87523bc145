//! In-memory page source

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{FetchError, PageSource, Pagination, PaginationParams};

/// Serves pages out of a record list held in memory
pub struct InMemoryPageSource<T> {
    records: RwLock<Vec<T>>,
}

impl<T> InMemoryPageSource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replace the record set. Pages fetched afterwards reflect the new data.
    pub async fn replace(&self, records: Vec<T>) {
        *self.records.write().await = records;
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<T> PageSource<T> for InMemoryPageSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get_page(&self, page: u32, page_size: u32) -> Result<Pagination<Vec<T>>, FetchError> {
        if page_size == 0 {
            return Err(FetchError::Source("page size must be at least 1".into()));
        }
        let records = self.records.read().await;
        Ok(Pagination::from_records(
            &records,
            PaginationParams::new(page, page_size),
        ))
    }
}
