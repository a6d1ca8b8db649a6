//! Blob object storage backing the state gateway.
//!
//! The gateway only needs the three operations the managed blob service
//! offers: prefix listing, content fetch by the listed URL, and an atomic
//! overwrite PUT at a stable pathname. `FsBlobStore` is the production
//! implementation (one file per object under a root directory);
//! `MemoryBlobStore` backs tests and ephemeral servers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("blob list failed: {0}")]
    List(String),
    #[error("blob fetch failed: {0}")]
    Fetch(String),
    #[error("blob put failed: {0}")]
    Put(String),
}

/// A listed object: its logical pathname plus the URL its content is
/// fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub pathname: String,
    pub url: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// List up to `limit` objects whose pathname starts with `prefix`.
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<BlobEntry>, BlobError>;

    /// Fetch an object's content by the URL returned from `list`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BlobError>;

    /// Store an object at `pathname`, overwriting any prior content.
    /// Pathnames are stable: repeated puts to the same pathname never
    /// accumulate history.
    async fn put(&self, pathname: &str, content: &[u8], content_type: &str)
        -> Result<(), BlobError>;
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Blob store rooted at a local directory. The listed URL is the absolute
/// file path.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, pathname: &str) -> PathBuf {
        self.root.join(pathname)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<BlobEntry>, BlobError> {
        let (dir_part, name_part) = match prefix.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), prefix.to_string()),
        };

        let dir = self.root.join(&dir_part);
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            // A missing directory just means nothing was ever stored there.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BlobError::List(e.to_string())),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| BlobError::List(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(&name_part) || name.ends_with(".tmp") {
                continue;
            }
            let pathname = if dir_part.is_empty() {
                name
            } else {
                format!("{}/{}", dir_part, name)
            };
            let url = entry.path().to_string_lossy().to_string();
            entries.push(BlobEntry { pathname, url });
        }

        entries.sort_by(|a, b| a.pathname.cmp(&b.pathname));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BlobError> {
        tokio::fs::read(url)
            .await
            .map_err(|e| BlobError::Fetch(format!("{}: {}", url, e)))
    }

    async fn put(
        &self,
        pathname: &str,
        content: &[u8],
        _content_type: &str,
    ) -> Result<(), BlobError> {
        let path = self.object_path(pathname);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Put(e.to_string()))?;
        }

        // Atomic overwrite: temp file in the same directory, then rename.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| BlobError::Put(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| BlobError::Put(e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory blob store for tests and `--blob-root`-less servers.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

const MEM_URL_SCHEME: &str = "mem://";

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<BlobEntry>, BlobError> {
        let objects = self.objects.read().await;
        let mut entries: Vec<BlobEntry> = objects
            .keys()
            .filter(|pathname| pathname.starts_with(prefix))
            .map(|pathname| BlobEntry {
                pathname: pathname.clone(),
                url: format!("{}{}", MEM_URL_SCHEME, pathname),
            })
            .collect();
        entries.sort_by(|a, b| a.pathname.cmp(&b.pathname));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BlobError> {
        let pathname = url.strip_prefix(MEM_URL_SCHEME).unwrap_or(url);
        let objects = self.objects.read().await;
        objects
            .get(pathname)
            .cloned()
            .ok_or_else(|| BlobError::Fetch(format!("object vanished: {}", pathname)))
    }

    async fn put(
        &self,
        pathname: &str,
        content: &[u8],
        _content_type: &str,
    ) -> Result<(), BlobError> {
        let mut objects = self.objects.write().await;
        objects.insert(pathname.to_string(), content.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        store
            .put("planner/2025-W45.json", b"{\"a\":1}", "application/json")
            .await
            .unwrap();

        let entries = store.list("planner/2025-W45.json", 1).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pathname, "planner/2025-W45.json");

        let content = store.fetch(&entries[0].url).await.unwrap();
        assert_eq!(content, b"{\"a\":1}");
    }

    #[tokio::test]
    async fn fs_store_list_misses_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let entries = store.list("planner/2025-W45.json", 1).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn fs_store_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        store
            .put("planner/2025-W01.json", b"v1", "application/json")
            .await
            .unwrap();
        store
            .put("planner/2025-W01.json", b"v2", "application/json")
            .await
            .unwrap();

        let entries = store.list("planner/2025-W01", 10).await.unwrap();
        assert_eq!(entries.len(), 1, "no history accumulates");
        assert_eq!(store.fetch(&entries[0].url).await.unwrap(), b"v2");
    }

    #[tokio::test]
    async fn fs_store_prefix_listing_is_exact_enough() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        store
            .put("planner/2025-W01.json", b"a", "application/json")
            .await
            .unwrap();
        store
            .put("planner/2025-W10.json", b"b", "application/json")
            .await
            .unwrap();

        let entries = store.list("planner/2025-W1", 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pathname, "planner/2025-W10.json");
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryBlobStore::new();
        store
            .put("planner/2025-W45.json", b"x", "application/json")
            .await
            .unwrap();
        let entries = store.list("planner/2025-W45.json", 1).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.fetch(&entries[0].url).await.unwrap(), b"x");
    }
}
