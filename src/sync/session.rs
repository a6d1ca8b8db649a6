//! Per-session identity and version tracking.
//!
//! Each browser-tab-equivalent session owns one `SessionState`: a random
//! client id generated at session start, the locally-tracked logical version
//! of the document, and the first-load flag that keeps the initial hydration
//! from echoing straight back to the server as a write. The id is a plain
//! field threaded through calls, never a global.

use crate::document::{client_id_of, has_payload, timestamp_of, PlannerDocument};
use serde_json::Value;
use uuid::Uuid;

pub struct SessionState {
    client_id: String,
    sync_version: u64,
    first_load: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::with_client_id(Uuid::new_v4().to_string())
    }

    pub fn with_client_id(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            sync_version: 0,
            first_load: true,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn sync_version(&self) -> u64 {
        self.sync_version
    }

    pub fn first_load(&self) -> bool {
        self.first_load
    }

    /// Initial hydration is done; edits from here on schedule saves.
    pub fn mark_loaded(&mut self) {
        self.first_load = false;
    }

    /// Whether a polled document should replace local state.
    ///
    /// Requires all of: written by another session (a missing clientId
    /// counts as "someone else"), a positive version strictly greater than
    /// the tracked one, and an actual payload. Own writes echoed back are
    /// never applied, so read-after-write propagation delay in the store
    /// cannot roll back a just-made edit.
    pub fn should_apply_remote(&self, doc: &Value) -> bool {
        let from_other = client_id_of(doc).map_or(true, |id| id != self.client_id);
        let version = timestamp_of(doc);
        from_other && version > self.sync_version && has_payload(doc)
    }

    /// Track the version of a document adopted into local state.
    pub fn adopt(&mut self, doc: &Value) {
        self.sync_version = timestamp_of(doc);
    }

    /// Stamp an outgoing document with a fresh timestamp and this session's
    /// id, and advance the tracked version optimistically - before the
    /// network write resolves. Returns the new timestamp.
    pub fn stamp(&mut self, doc: &mut PlannerDocument) -> u64 {
        let ts = crate::sync::now_ms();
        self.sync_version = ts;
        doc.updated_at = ts;
        doc.client_id = Some(self.client_id.clone());
        ts
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
