//! Sources backed by JSON files on disk
//!
//! Files are re-read on every call so edits show up without a restart.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{
    FetchError, NetbirdRelease, PageSource, Pagination, PaginationParams, ReleaseSource,
};

async fn read_json<D: DeserializeOwned>(path: &Path) -> Result<D, FetchError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FetchError::Source(format!("cannot read {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read JSON source");

    serde_json::from_slice(&bytes)
        .map_err(|e| FetchError::MalformedPayload(format!("{}: {}", path.display(), e)))
}

/// Pages over a JSON array of records stored in a file
pub struct JsonFilePageSource<T> {
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFilePageSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> PageSource<T> for JsonFilePageSource<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn get_page(&self, page: u32, page_size: u32) -> Result<Pagination<Vec<T>>, FetchError> {
        if page_size == 0 {
            return Err(FetchError::Source("page size must be at least 1".into()));
        }
        let records: Vec<T> = read_json(&self.path).await?;
        Ok(Pagination::from_records(
            &records,
            PaginationParams::new(page, page_size),
        ))
    }
}

/// Reads a single [`NetbirdRelease`] document from a file
pub struct JsonFileReleaseSource {
    path: PathBuf,
}

impl JsonFileReleaseSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReleaseSource for JsonFileReleaseSource {
    async fn latest_release(&self) -> Result<NetbirdRelease, FetchError> {
        read_json(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempJson(PathBuf);

    impl TempJson {
        fn new(contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!("netbird-dash-{}.json", uuid::Uuid::new_v4()));
            std::fs::write(&path, contents).unwrap();
            Self(path)
        }
    }

    impl Drop for TempJson {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[tokio::test]
    async fn pages_over_file_records() {
        let file = TempJson::new(r#"[{"id":1},{"id":2},{"id":3}]"#);
        let source = JsonFilePageSource::<serde_json::Value>::new(&file.0);

        let page = source.get_page(2, 2).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0]["id"], 3);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn malformed_file_is_a_malformed_payload() {
        let file = TempJson::new("[1, 2,");
        let source = JsonFilePageSource::<u32>::new(&file.0);

        assert!(matches!(
            source.get_page(1, 10).await,
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let source = JsonFilePageSource::<u32>::new("/nonexistent/netbird-dash/records.json");
        assert!(matches!(source.get_page(1, 10).await, Err(FetchError::Source(_))));
    }

    #[tokio::test]
    async fn reads_release_document() {
        let file = TempJson::new(
            r#"{"latest_version":"v0.28.4","last_checked":1720000000000,"url":"https://example.com/netbird"}"#,
        );
        let source = JsonFileReleaseSource::new(&file.0);

        let release = source.latest_release().await.unwrap();
        assert_eq!(release.latest_version, "v0.28.4");
        assert_eq!(release.last_checked.timestamp_millis(), 1_720_000_000_000);
    }
}
