//! Store capability trait

use crate::error::Result;
use crate::types::{CacheStats, CachedResponse, RequestKey};
use async_trait::async_trait;
use std::sync::Arc;

/// A response cache keyed by request identity.
///
/// A lookup miss is `Ok(None)`; `Err` is reserved for storage faults.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Look up a snapshot by request identity.
    async fn get(&self, key: &RequestKey) -> Result<Option<CachedResponse>>;

    /// Store a single snapshot, replacing any existing one for the key.
    async fn put(&self, key: &RequestKey, response: CachedResponse) -> Result<()>;

    /// Store a batch of snapshots, all-or-nothing: if any entry cannot be
    /// written, no entry is committed.
    async fn put_all(&self, entries: Vec<(RequestKey, CachedResponse)>) -> Result<()>;

    /// Current statistics.
    async fn stats(&self) -> CacheStats;
}

#[async_trait]
impl<S: ResponseStore + ?Sized> ResponseStore for Arc<S> {
    async fn get(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &RequestKey, response: CachedResponse) -> Result<()> {
        (**self).put(key, response).await
    }

    async fn put_all(&self, entries: Vec<(RequestKey, CachedResponse)>) -> Result<()> {
        (**self).put_all(entries).await
    }

    async fn stats(&self) -> CacheStats {
        (**self).stats().await
    }
}
