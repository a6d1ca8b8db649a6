//! HTTP client for the state gateway, used by the sync loop.

use crate::week::WeekKey;
use reqwest::{header, StatusCode};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("state request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0} from state gateway")]
    Status(StatusCode),
}

/// Outcome of a push: accepted, or rejected because the server holds a
/// newer document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Conflict { server_updated_at: u64 },
}

/// Thin reqwest wrapper over the gateway's GET/PUT surface.
///
/// Reads attach a millisecond cache-buster query parameter and no-cache
/// request headers so that no intermediary ever serves a stale document.
pub struct RemoteStateClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteStateClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn state_url(&self, key: &WeekKey) -> String {
        format!("{}/state/{}", self.base_url, key)
    }

    /// Fetch the document for a week key. `None` means the key was never
    /// written (the gateway returned JSON `null`).
    pub async fn fetch_state(&self, key: &WeekKey) -> Result<Option<Value>, SyncError> {
        let url = format!("{}?ts={}", self.state_url(key), crate::sync::now_ms());
        let response = self
            .http
            .get(&url)
            .header(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Status(response.status()));
        }

        let doc: Value = response.json().await?;
        Ok(if doc.is_null() { None } else { Some(doc) })
    }

    /// Push a full document payload for a week key.
    pub async fn push_state(
        &self,
        key: &WeekKey,
        payload: &Value,
    ) -> Result<PushOutcome, SyncError> {
        let response = self
            .http
            .put(self.state_url(key))
            .json(payload)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(PushOutcome::Pushed),
            StatusCode::CONFLICT => {
                let body: Value = response.json().await.unwrap_or(Value::Null);
                let server_updated_at = body
                    .get("serverUpdatedAt")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                Ok(PushOutcome::Conflict { server_updated_at })
            }
            status => Err(SyncError::Status(status)),
        }
    }
}
