//! Browser-local-storage analogue: a single file holding the last
//! known-good document.
//!
//! The cache has exactly two jobs: win the initial-load race when it holds a
//! newer document than the server (e.g. a reload before an in-flight save
//! landed), and survive page-reload-equivalent restarts. It is written on
//! every edit, before the debounced network save.

use serde_json::Value;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// File name under the cache directory, the stand-in for a browser
/// local-storage entry.
pub const CACHE_FILE_NAME: &str = "planner-state.json";

pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(CACHE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the cached document. Missing or corrupt files read as `None`;
    /// the cache is a best-effort fallback, never an error source.
    pub async fn load(&self) -> Option<Value> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!("local cache unreadable: {}", e);
                }
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!("local cache corrupt, ignoring: {}", e);
                None
            }
        }
    }

    /// Persist a document. Atomic (temp + rename) so a crash mid-write
    /// never leaves a truncated cache behind.
    pub async fn store(&self, doc: &Value) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_vec(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        assert_eq!(cache.load().await, None, "empty cache reads as None");

        let doc = json!({"people": [], "updatedAt": 42});
        cache.store(&doc).await.unwrap();
        assert_eq!(cache.load().await, Some(doc));
    }

    #[tokio::test]
    async fn corrupt_cache_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        tokio::fs::write(cache.path(), b"{not json").await.unwrap();
        assert_eq!(cache.load().await, None);
    }

    #[tokio::test]
    async fn store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.store(&json!({"updatedAt": 1})).await.unwrap();
        cache.store(&json!({"updatedAt": 2})).await.unwrap();
        assert_eq!(cache.load().await.unwrap()["updatedAt"], 2);
    }
}
