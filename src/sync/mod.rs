//! Client synchronization: session state, local cache, debounced saves,
//! and the polling loop that reconciles concurrent edits across sessions.

pub mod client;
pub mod debounce;
pub mod local_cache;
pub mod runner;
pub mod session;

pub use client::{PushOutcome, RemoteStateClient, SyncError};
pub use debounce::Debouncer;
pub use local_cache::LocalCache;
pub use runner::{SyncConfig, SyncLoop, DEFAULT_DEBOUNCE_WINDOW, DEFAULT_POLL_INTERVAL};
pub use session::SessionState;

/// Wall-clock milliseconds since the epoch: the logical timestamp source.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
