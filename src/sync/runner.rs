//! The client synchronization loop.
//!
//! One `SyncLoop` per session keeps in-memory planning state consistent with
//! the shared server document for the currently-viewed week, across three
//! event sources: initial load, periodic polling, and local edits.
//!
//! Lock order is week, then session, then state throughout; the poll
//! task, the load pass, and the edit path all take them in that order.

use crate::document::{has_payload, timestamp_of, PlannerDocument};
use crate::sync::client::{PushOutcome, RemoteStateClient};
use crate::sync::debounce::Debouncer;
use crate::sync::local_cache::LocalCache;
use crate::sync::session::SessionState;
use crate::week::WeekKey;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default poll interval, matching the original's 1 s timer.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
/// Default save debounce window.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub server_url: String,
    pub cache_dir: PathBuf,
    pub poll_interval: Duration,
    pub debounce_window: Duration,
}

impl SyncConfig {
    pub fn new(server_url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            server_url: server_url.into(),
            cache_dir: cache_dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

pub struct SyncLoop {
    client: Arc<RemoteStateClient>,
    cache: Arc<LocalCache>,
    session: Arc<RwLock<SessionState>>,
    week: Arc<RwLock<WeekKey>>,
    state: Arc<RwLock<PlannerDocument>>,
    saver: Debouncer<(WeekKey, Value)>,
    poll_task: JoinHandle<()>,
    wake_tx: mpsc::Sender<()>,
}

impl SyncLoop {
    /// Start a session for `week`: spawn the poll task and run the initial
    /// load (remote vs. local cache, newest `updatedAt` wins, remote wins
    /// ties).
    pub async fn start(config: SyncConfig, week: WeekKey) -> Self {
        let client = Arc::new(RemoteStateClient::new(config.server_url.clone()));
        let cache = Arc::new(LocalCache::new(config.cache_dir.clone()));
        let session = Arc::new(RwLock::new(SessionState::new()));
        let week = Arc::new(RwLock::new(week));
        let state = Arc::new(RwLock::new(PlannerDocument::default()));

        let saver = {
            let client = client.clone();
            Debouncer::new(config.debounce_window, move |(wk, payload): (WeekKey, Value)| {
                let client = client.clone();
                async move {
                    // Background saves swallow failures: the next edit's
                    // debounced save retries with fresh state.
                    match client.push_state(&wk, &payload).await {
                        Ok(PushOutcome::Pushed) => {}
                        Ok(PushOutcome::Conflict { server_updated_at }) => {
                            warn!(
                                week = %wk,
                                server_updated_at,
                                "background save lost a version race"
                            );
                        }
                        Err(e) => warn!(week = %wk, "background save failed: {}", e),
                    }
                }
            })
        };

        let (wake_tx, wake_rx) = mpsc::channel(1);
        let poll_task = tokio::spawn(poll_task(
            client.clone(),
            session.clone(),
            week.clone(),
            state.clone(),
            config.poll_interval,
            wake_rx,
        ));

        let sync_loop = Self {
            client,
            cache,
            session,
            week,
            state,
            saver,
            poll_task,
            wake_tx,
        };
        sync_loop.load(true).await;
        sync_loop
    }

    /// This session's client id.
    pub async fn client_id(&self) -> String {
        self.session.read().await.client_id().to_string()
    }

    /// The locally-tracked document version.
    pub async fn sync_version(&self) -> u64 {
        self.session.read().await.sync_version()
    }

    /// The currently-viewed week.
    pub async fn week(&self) -> WeekKey {
        self.week.read().await.clone()
    }

    /// A copy of the current in-memory planning state.
    pub async fn snapshot(&self) -> PlannerDocument {
        self.state.read().await.clone()
    }

    /// The user-facing "reload planning" action: re-run the load pass
    /// without touching the first-load flag.
    pub async fn reload(&self) {
        self.load(false).await;
    }

    /// Switch the viewed week and load its state. In-flight requests for
    /// the previous week are not cancelled; their responses are discarded
    /// when they no longer match the viewed week.
    pub async fn set_week(&self, week: WeekKey) {
        *self.week.write().await = week;
        self.load(true).await;
    }

    /// Nudge the poll task outside its timer, the window-focus analogue.
    pub fn wake(&self) {
        let _ = self.wake_tx.try_send(());
    }

    /// Apply a local mutation and schedule the debounced save.
    ///
    /// The tracked version advances and the local cache is written before
    /// the network write is even scheduled; a reload right after an edit
    /// must never lose it. Hydration-phase edits (first load still pending)
    /// mutate state but schedule nothing.
    pub async fn edit(&self, mutate: impl FnOnce(&mut PlannerDocument)) {
        // The week is captured under the same lock scope as the mutation,
        // so a concurrent week switch cannot tag this payload with a week
        // the state never belonged to.
        let week_guard = self.week.read().await;
        let week = week_guard.clone();
        let mut session = self.session.write().await;
        let mut state = self.state.write().await;
        mutate(&mut state);

        if session.first_load() {
            return;
        }
        session.stamp(&mut state);

        let payload = match serde_json::to_value(&*state) {
            Ok(v) => v,
            Err(e) => {
                warn!("failed to serialize planning state: {}", e);
                return;
            }
        };
        drop(state);
        drop(session);
        drop(week_guard);

        if let Err(e) = self.cache.store(&payload).await {
            warn!("local cache write failed: {}", e);
        }
        self.saver.push((week, payload));
    }

    /// The load pass: race the gateway read against the local cache and
    /// adopt the newest plausible candidate.
    async fn load(&self, mark_loaded: bool) {
        let week = self.week.read().await.clone();

        let (remote, local) = tokio::join!(self.client.fetch_state(&week), self.cache.load());
        let remote = match remote {
            Ok(doc) => doc.filter(has_payload),
            Err(e) => {
                debug!(week = %week, "remote load failed, falling back to cache: {}", e);
                None
            }
        };
        let local = local.filter(has_payload);

        // Remote is the first candidate and comparison is strictly
        // greater, so ties go to the server copy.
        let newest = match (remote, local) {
            (Some(r), Some(l)) => {
                if timestamp_of(&l) > timestamp_of(&r) {
                    Some(l)
                } else {
                    Some(r)
                }
            }
            (remote, local) => remote.or(local),
        };

        if let Some(doc) = newest {
            // The viewed week may have changed while the fetch was in
            // flight; a response for an abandoned week is dropped.
            if *self.week.read().await == week {
                let mut session = self.session.write().await;
                session.adopt(&doc);
                *self.state.write().await = PlannerDocument::from_value(doc).normalized();
            }
        }

        if mark_loaded {
            self.session.write().await.mark_loaded();
        }
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}

/// Background polling: a fixed-interval timer plus external wakes, each
/// firing one skip-if-busy poll of the current week.
///
/// Polls run as detached tasks so a slow fetch never stalls the timer;
/// the shared flag is what drops firings that overlap an in-flight poll.
async fn poll_task(
    client: Arc<RemoteStateClient>,
    session: Arc<RwLock<SessionState>>,
    week: Arc<RwLock<WeekKey>>,
    state: Arc<RwLock<PlannerDocument>>,
    interval: Duration,
    mut wake_rx: mpsc::Receiver<()>,
) {
    let polling = Arc::new(AtomicBool::new(false));
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            wake = wake_rx.recv() => {
                if wake.is_none() {
                    break;
                }
            }
        }
        tokio::spawn(poll_once(
            client.clone(),
            session.clone(),
            week.clone(),
            state.clone(),
            polling.clone(),
        ));
    }
}

async fn poll_once(
    client: Arc<RemoteStateClient>,
    session: Arc<RwLock<SessionState>>,
    week: Arc<RwLock<WeekKey>>,
    state: Arc<RwLock<PlannerDocument>>,
    polling: Arc<AtomicBool>,
) {
    // A firing that finds a poll still in flight is skipped, not queued.
    if polling.swap(true, Ordering::SeqCst) {
        return;
    }

    let polled_week = week.read().await.clone();
    match client.fetch_state(&polled_week).await {
        Ok(Some(doc)) => {
            // Discard responses for a week the user has since left.
            if *week.read().await == polled_week {
                let mut session = session.write().await;
                if session.should_apply_remote(&doc) {
                    session.adopt(&doc);
                    *state.write().await = PlannerDocument::from_value(doc).normalized();
                }
            }
        }
        Ok(None) => {}
        Err(e) => debug!(week = %polled_week, "poll failed: {}", e),
    }

    polling.store(false, Ordering::SeqCst);
}

// Loop behavior is exercised end-to-end in tests/sync_loop_tests.rs against
// a real served router.
