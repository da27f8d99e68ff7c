//! In-memory namespace store

use crate::error::Result;
use crate::store::ResponseStore;
use crate::types::{CacheStats, CachedResponse, RequestKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory response store for a single cache namespace.
///
/// Entries live until the store is dropped; there is no eviction and no TTL.
pub struct MemoryStore {
    namespace: String,
    entries: RwLock<HashMap<String, CachedResponse>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl ResponseStore for MemoryStore {
    async fn get(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        let entries = self.entries.read().await;
        match entries.get(&key.canonical()) {
            Some(snapshot) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(snapshot.clone()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &RequestKey, response: CachedResponse) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.canonical(), response);
        Ok(())
    }

    async fn put_all(&self, batch: Vec<(RequestKey, CachedResponse)>) -> Result<()> {
        // Single write guard: concurrent readers see either none or all of
        // the batch.
        let mut entries = self.entries.write().await;
        let count = batch.len();
        for (key, response) in batch {
            entries.insert(key.canonical(), response);
        }
        debug!(
            namespace = %self.namespace,
            committed = count,
            entries = entries.len(),
            "Committed bulk fill"
        );
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            entries: entries.len(),
            total_size: entries.values().map(|e| e.size()).sum(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
