//! File-backed namespace store
//!
//! Lays out one directory per namespace under a root directory. Each entry is
//! a body file plus a JSON metadata sidecar, both named by the key digest.
//! Distinct namespaces never share entries; a namespace abandoned by a version
//! bump keeps its directory until an external cleanup step removes it.

use crate::error::Result;
use crate::store::ResponseStore;
use crate::types::{CacheStats, CachedResponse, RequestKey};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, warn};

/// Metadata sidecar written next to each body file.
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    method: String,
    url: String,
    status: u16,
    content_type: String,
    size: u64,
    stored_at: DateTime<Utc>,
}

/// Persistent response store for a single cache namespace.
pub struct FileStore {
    namespace: String,
    dir: PathBuf,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FileStore {
    /// Create a store rooted at `root`, scoped to `namespace`.
    pub fn new(root: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let dir = root.into().join(&namespace);
        Self {
            namespace,
            dir,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create the namespace directory if absent.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        debug!(namespace = %self.namespace, dir = ?self.dir, "Opened cache namespace");
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn body_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", digest))
    }

    fn meta_path(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{}.json", digest))
    }

    /// Write one entry's body and metadata to staging paths.
    async fn stage_entry(
        &self,
        body_tmp: &Path,
        meta_tmp: &Path,
        key: &RequestKey,
        response: &CachedResponse,
    ) -> Result<()> {
        let meta = EntryMeta {
            method: key.method.clone(),
            url: key.url.clone(),
            status: response.status,
            content_type: response.content_type.clone(),
            size: response.size(),
            stored_at: response.stored_at,
        };
        let meta_json = serde_json::to_vec(&meta)?;
        fs::write(body_tmp, &response.body).await?;
        fs::write(meta_tmp, &meta_json).await?;
        Ok(())
    }
}

#[async_trait]
impl ResponseStore for FileStore {
    async fn get(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        let digest = key.digest();

        let meta_bytes = match fs::read(self.meta_path(&digest)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let meta: EntryMeta = serde_json::from_slice(&meta_bytes)?;

        let body = match fs::read(self.body_path(&digest)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(url = %meta.url, "Cache entry has metadata but no body file");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(Some(CachedResponse {
            status: meta.status,
            content_type: meta.content_type,
            body,
            stored_at: meta.stored_at,
        }))
    }

    async fn put(&self, key: &RequestKey, response: CachedResponse) -> Result<()> {
        let digest = key.digest();
        let body_tmp = self.dir.join(format!("{}.bin.tmp", digest));
        let meta_tmp = self.dir.join(format!("{}.json.tmp", digest));

        // Stage then rename, so readers never observe a torn entry.
        self.stage_entry(&body_tmp, &meta_tmp, key, &response).await?;
        fs::rename(&body_tmp, self.body_path(&digest)).await?;
        fs::rename(&meta_tmp, self.meta_path(&digest)).await?;
        Ok(())
    }

    async fn put_all(&self, entries: Vec<(RequestKey, CachedResponse)>) -> Result<()> {
        // Stage every entry first; nothing is renamed into place until the
        // whole batch has been written.
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(entries.len() * 2);

        for (key, response) in &entries {
            let digest = key.digest();
            let body_tmp = self.dir.join(format!("{}.bin.tmp", digest));
            let meta_tmp = self.dir.join(format!("{}.json.tmp", digest));

            if let Err(e) = self.stage_entry(&body_tmp, &meta_tmp, key, response).await {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp).await;
                }
                let _ = fs::remove_file(&body_tmp).await;
                let _ = fs::remove_file(&meta_tmp).await;
                return Err(e);
            }

            staged.push((body_tmp, self.body_path(&digest)));
            staged.push((meta_tmp, self.meta_path(&digest)));
        }

        for (i, (tmp, dest)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, dest).await {
                // Roll back: a failed commit must leave no partial set behind,
                // neither committed entries nor stranded staging files.
                for (_, committed) in &staged[..i] {
                    let _ = fs::remove_file(committed).await;
                }
                for (tmp, _) in &staged[i..] {
                    let _ = fs::remove_file(tmp).await;
                }
                return Err(e.into());
            }
        }

        debug!(
            namespace = %self.namespace,
            committed = entries.len(),
            "Committed bulk fill"
        );
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ..Default::default()
        };

        let Ok(mut dir) = fs::read_dir(&self.dir).await else {
            return stats;
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "bin") {
                stats.entries += 1;
                if let Ok(meta) = entry.metadata().await {
                    stats.total_size += meta.len();
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn icon_key() -> RequestKey {
        RequestKey::new("GET", "/static/board/trash-icon.svg")
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "trash-board-v2");
        store.init().await.unwrap();

        let snapshot = CachedResponse::new(200, "image/svg+xml", b"<svg/>".to_vec());
        store.put(&icon_key(), snapshot.clone()).await.unwrap();

        let hit = store.get(&icon_key()).await.unwrap().unwrap();
        assert_eq!(hit.status, 200);
        assert_eq!(hit.content_type, "image/svg+xml");
        assert_eq!(hit.body, b"<svg/>");
    }

    #[tokio::test]
    async fn test_get_miss() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "trash-board-v2");
        store.init().await.unwrap();

        assert!(store.get(&icon_key()).await.unwrap().is_none());
        assert_eq!(store.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_put_all_commits_every_entry() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "trash-board-v2");
        store.init().await.unwrap();

        let batch = vec![
            (
                RequestKey::new("GET", "/a.css"),
                CachedResponse::new(200, "text/css", b"a{}".to_vec()),
            ),
            (
                RequestKey::new("GET", "/b.js"),
                CachedResponse::new(200, "text/javascript", b";".to_vec()),
            ),
        ];
        store.put_all(batch).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.entries, 2);
        assert!(store
            .get(&RequestKey::new("GET", "/b.js"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_put_all_failure_commits_nothing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "trash-board-v2");
        // init() deliberately skipped: staging writes fail with NotFound.

        let batch = vec![(
            icon_key(),
            CachedResponse::new(200, "image/svg+xml", b"<svg/>".to_vec()),
        )];
        assert!(store.put_all(batch).await.is_err());

        store.init().await.unwrap();
        assert_eq!(store.stats().await.entries, 0);
        assert!(store.get(&icon_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_all_rename_failure_rolls_back_committed_entries() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "trash-board-v2");
        store.init().await.unwrap();

        let a = RequestKey::new("GET", "/a.css");
        let b = RequestKey::new("GET", "/b.js");
        // A directory squatting on b's metadata destination makes its rename
        // fail after a's files are already in place.
        fs::create_dir(store.meta_path(&b.digest())).await.unwrap();

        let batch = vec![
            (
                a.clone(),
                CachedResponse::new(200, "text/css", b"a{}".to_vec()),
            ),
            (
                b.clone(),
                CachedResponse::new(200, "text/javascript", b";".to_vec()),
            ),
        ];
        assert!(store.put_all(batch).await.is_err());

        // All-or-nothing: the entries committed before the failure were
        // rolled back, and no staging files were left behind.
        assert!(store.get(&a).await.unwrap().is_none());
        assert_eq!(store.stats().await.entries, 0);

        let mut leftovers = fs::read_dir(&store.dir).await.unwrap();
        while let Ok(Some(entry)) = leftovers.next_entry().await {
            let path = entry.path();
            assert!(path.is_dir(), "unexpected leftover file: {:?}", path);
        }
    }

    #[tokio::test]
    async fn test_namespaces_are_disjoint() {
        let dir = tempdir().unwrap();
        let v1 = FileStore::new(dir.path(), "trash-board-v1");
        let v2 = FileStore::new(dir.path(), "trash-board-v2");
        v1.init().await.unwrap();
        v2.init().await.unwrap();

        v1.put(&icon_key(), CachedResponse::new(200, "image/svg+xml", vec![1]))
            .await
            .unwrap();

        assert!(v1.get(&icon_key()).await.unwrap().is_some());
        assert!(v2.get(&icon_key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path(), "trash-board-v2");
        store.init().await.unwrap();

        store
            .put(&icon_key(), CachedResponse::new(200, "image/svg+xml", vec![1]))
            .await
            .unwrap();
        store
            .put(&icon_key(), CachedResponse::new(200, "image/svg+xml", vec![2, 3]))
            .await
            .unwrap();

        let hit = store.get(&icon_key()).await.unwrap().unwrap();
        assert_eq!(hit.body, vec![2, 3]);
        assert_eq!(store.stats().await.entries, 1);
    }
}
