//! State Store Gateway - a week-keyed JSON document store over blob storage.
//!
//! One object per week key, at the deterministic pathname
//! `planner/<key>.json`, overwritten in place on every write. The write path
//! carries an advisory version guard: when the incoming payload has a
//! positive `updatedAt` and the stored document's timestamp is greater or
//! equal, the write is rejected with a version conflict instead of clobbering
//! a newer document the writer never saw. A payload without a positive
//! timestamp bypasses the guard entirely and force-overwrites; this is the
//! deliberate escape hatch for administrative overwrites and imports.

mod api;

pub use api::router;

use crate::blob::{BlobError, BlobStore};
use crate::document::{merge_shallow, timestamp_of};
use crate::week::WeekKey;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// The stored object exists but is not parseable JSON. Surfaced like a
    /// fetch failure: retryable, distinct from "not found".
    #[error("stored document is not valid JSON: {0}")]
    Corrupt(String),
    #[error("write payload must be a JSON object")]
    NotAnObject,
}

/// Outcome of a write: stored, or rejected because the server already holds
/// a document at least as new as the incoming one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Stored,
    Conflict { server_updated_at: u64 },
}

/// The gateway service: read and write planner documents by week key.
pub struct StateGateway {
    store: Arc<dyn BlobStore>,
}

impl StateGateway {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Storage pathname for a week key. `WeekKey` is validated at parse
    /// time, so the rendered key is always a safe path segment.
    fn pathname(key: &WeekKey) -> String {
        format!("planner/{}.json", key)
    }

    /// Read the stored document for a key. A key that was never written
    /// reads as `None`, not an error.
    pub async fn read(&self, key: &WeekKey) -> Result<Option<Value>, GatewayError> {
        let pathname = Self::pathname(key);
        let entries = self.store.list(&pathname, 1).await?;

        let Some(entry) = entries.into_iter().find(|e| e.pathname == pathname) else {
            return Ok(None);
        };

        let content = self.store.fetch(&entry.url).await?;
        let doc: Value =
            serde_json::from_slice(&content).map_err(|e| GatewayError::Corrupt(e.to_string()))?;
        Ok(Some(doc))
    }

    /// Write a document (full or partial) for a key.
    ///
    /// The version guard only engages when the payload carries a positive
    /// `updatedAt`. Partial payloads (`{partial: true, data: {...}}`) are
    /// shallow-merged over the stored document before writing; the envelope's
    /// `updatedAt` and `clientId` are stamped onto the merged result.
    pub async fn write(&self, key: &WeekKey, payload: Value) -> Result<WriteOutcome, GatewayError> {
        let Some(envelope) = payload.as_object() else {
            return Err(GatewayError::NotAnObject);
        };

        let incoming_ts = timestamp_of(&payload);
        let partial_data = envelope
            .get("partial")
            .and_then(Value::as_bool)
            .unwrap_or(false)
            .then(|| envelope.get("data").and_then(Value::as_object).cloned())
            .flatten();

        // The guard and the partial merge both need the current document;
        // skip the extra read when neither applies.
        let current = if incoming_ts > 0 || partial_data.is_some() {
            self.read(key).await?
        } else {
            None
        };

        if incoming_ts > 0 {
            if let Some(stored) = &current {
                let server_ts = timestamp_of(stored);
                if server_ts >= incoming_ts {
                    return Ok(WriteOutcome::Conflict {
                        server_updated_at: server_ts,
                    });
                }
            }
        }

        let body = match partial_data {
            Some(data) => {
                let base = current.unwrap_or_else(|| Value::Object(Default::default()));
                let mut merged = merge_shallow(base, &data);
                if let Some(map) = merged.as_object_mut() {
                    if let Some(ts) = envelope.get("updatedAt") {
                        map.insert("updatedAt".to_string(), ts.clone());
                    }
                    if let Some(client) = envelope.get("clientId") {
                        map.insert("clientId".to_string(), client.clone());
                    }
                }
                merged
            }
            None => payload,
        };

        let content =
            serde_json::to_vec(&body).map_err(|e| GatewayError::Corrupt(e.to_string()))?;
        self.store
            .put(&Self::pathname(key), &content, CONTENT_TYPE_JSON)
            .await?;
        Ok(WriteOutcome::Stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use serde_json::json;

    fn gateway() -> StateGateway {
        StateGateway::new(Arc::new(MemoryBlobStore::new()))
    }

    fn week(s: &str) -> WeekKey {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn read_of_absent_key_is_none() {
        let gw = gateway();
        assert_eq!(gw.read(&week("2025-W45")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let gw = gateway();
        let key = week("2025-W45");
        let doc = json!({"people": [{"id": "p1"}], "updatedAt": 1000, "clientId": "A"});

        let outcome = gw.write(&key, doc.clone()).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Stored);
        assert_eq!(gw.read(&key).await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn stale_write_is_rejected_and_keeps_content() {
        let gw = gateway();
        let key = week("2025-W45");
        let newer = json!({"people": [{"id": "new"}], "updatedAt": 900});
        gw.write(&key, newer.clone()).await.unwrap();

        let outcome = gw
            .write(&key, json!({"people": [], "updatedAt": 500}))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Conflict {
                server_updated_at: 900
            }
        );
        assert_eq!(gw.read(&key).await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn equal_timestamp_is_a_conflict() {
        let gw = gateway();
        let key = week("2025-W45");
        gw.write(&key, json!({"people": [], "updatedAt": 700}))
            .await
            .unwrap();
        let outcome = gw
            .write(&key, json!({"people": [{"id": "x"}], "updatedAt": 700}))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Conflict {
                server_updated_at: 700
            }
        );
    }

    #[tokio::test]
    async fn zero_timestamp_bypasses_the_guard() {
        let gw = gateway();
        let key = week("2025-W45");
        gw.write(&key, json!({"people": [{"id": "a"}], "updatedAt": 900}))
            .await
            .unwrap();

        // Force overwrite: no positive timestamp, guard never engages.
        let forced = json!({"people": [], "updatedAt": 0});
        assert_eq!(
            gw.write(&key, forced.clone()).await.unwrap(),
            WriteOutcome::Stored
        );
        assert_eq!(gw.read(&key).await.unwrap(), Some(forced));
    }

    #[tokio::test]
    async fn partial_write_merges_shallowly() {
        let gw = gateway();
        let key = week("2025-W45");
        gw.write(
            &key,
            json!({
                "people": [{"id": "p1"}],
                "sites": [{"id": "s1"}],
                "hoursPerDay": 7,
                "updatedAt": 100,
                "clientId": "A",
            }),
        )
        .await
        .unwrap();

        let outcome = gw
            .write(
                &key,
                json!({
                    "partial": true,
                    "data": {"assignments": [{"id": "a1", "personId": "p1", "siteId": "s1", "date": "2025-11-03"}]},
                    "updatedAt": 200,
                    "clientId": "B",
                }),
            )
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Stored);

        let stored = gw.read(&key).await.unwrap().unwrap();
        assert_eq!(stored["people"][0]["id"], "p1", "untouched fields survive");
        assert_eq!(stored["sites"][0]["id"], "s1");
        assert_eq!(stored["hoursPerDay"], 7);
        assert_eq!(stored["assignments"][0]["id"], "a1");
        assert_eq!(stored["updatedAt"], 200);
        assert_eq!(stored["clientId"], "B");
        assert!(stored.get("partial").is_none(), "envelope is not stored");
    }

    #[tokio::test]
    async fn partial_write_to_absent_key_creates_the_document() {
        let gw = gateway();
        let key = week("2026-W01");
        gw.write(
            &key,
            json!({"partial": true, "data": {"people": [{"id": "p9"}]}, "updatedAt": 50}),
        )
        .await
        .unwrap();

        let stored = gw.read(&key).await.unwrap().unwrap();
        assert_eq!(stored["people"][0]["id"], "p9");
        assert_eq!(stored["updatedAt"], 50);
    }

    #[tokio::test]
    async fn non_object_payload_is_rejected() {
        let gw = gateway();
        let err = gw.write(&week("2025-W45"), json!([1, 2, 3])).await;
        assert!(matches!(err, Err(GatewayError::NotAnObject)));
    }
}
