//! HTTP routes for the state gateway.
//!
//! GET responses carry no-store cache headers: every read must reach the
//! origin store, never an intermediary cache, or a session could poll a
//! stale document and miss a peer's write.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{GatewayError, StateGateway, WriteOutcome};
use crate::blob::BlobError;
use crate::week::WeekKey;

/// Create the gateway router.
pub fn router(gateway: Arc<StateGateway>) -> Router {
    Router::new()
        .route("/state/:key", get(get_state).put(put_state))
        .with_state(gateway)
}

fn parse_key(raw: &str) -> Result<WeekKey, Response> {
    raw.parse::<WeekKey>().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_week_key", "message": e.to_string()})),
        )
            .into_response()
    })
}

/// Map gateway errors onto the HTTP surface. Fetch-layer failures after a
/// successful list are retryable (502); put failures are fatal for the
/// attempt (500) and logged with an operator hint.
fn error_response(err: GatewayError) -> Response {
    match err {
        GatewayError::Blob(BlobError::Put(reason)) => {
            tracing::error!(
                "blob put failed: {} (check blob storage credentials and quota)",
                reason
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "blob_put_failed",
                    "message": reason,
                    "hint": "check blob storage credentials and quota",
                })),
            )
                .into_response()
        }
        GatewayError::Blob(BlobError::Fetch(reason)) | GatewayError::Corrupt(reason) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": "blob_fetch_failed", "message": reason})),
        )
            .into_response(),
        GatewayError::Blob(BlobError::List(reason)) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": "blob_list_failed", "message": reason})),
        )
            .into_response(),
        GatewayError::NotAnObject => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_payload", "message": err.to_string()})),
        )
            .into_response(),
    }
}

/// GET /state/{key} - the stored document, or JSON `null` when the key was
/// never written.
async fn get_state(State(gateway): State<Arc<StateGateway>>, Path(key): Path<String>) -> Response {
    let key = match parse_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match gateway.read(&key).await {
        Ok(doc) => {
            let mut response = Json(doc.unwrap_or(Value::Null)).into_response();
            let headers = response.headers_mut();
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate"),
            );
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            response
        }
        Err(e) => error_response(e),
    }
}

/// PUT /state/{key} - store a full or partial document.
async fn put_state(
    State(gateway): State<Arc<StateGateway>>,
    Path(key): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let key = match parse_key(&key) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match gateway.write(&key, payload).await {
        Ok(WriteOutcome::Stored) => Json(json!({"ok": true})).into_response(),
        Ok(WriteOutcome::Conflict { server_updated_at }) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "version_conflict",
                "serverUpdatedAt": server_updated_at,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
