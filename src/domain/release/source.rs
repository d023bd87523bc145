//! Release check port

use async_trait::async_trait;

use super::NetbirdRelease;
use crate::domain::FetchError;

/// External collaborator that reports the latest published release.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn latest_release(&self) -> Result<NetbirdRelease, FetchError>;
}
