//! Planner Sync - a headless planning session against a state gateway.
//!
//! Starts one synchronization loop for the chosen week, keeps polling for
//! peer edits, and logs a summary whenever the adopted document changes.
//! Useful for watching a shared planner from a terminal and for exercising
//! the sync path against a running server.

use clap::Parser;
use planner_state::cli::SyncArgs;
use planner_state::sync::{SyncConfig, SyncLoop};
use planner_state::week::WeekKey;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let args = SyncArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planner_state=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let week = match &args.week {
        Some(raw) => match raw.parse::<WeekKey>() {
            Ok(week) => week,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => WeekKey::current(),
    };

    let cache_dir = args
        .cache_dir
        .unwrap_or_else(|| std::env::temp_dir().join("planner-sync"));

    let mut config = SyncConfig::new(args.server_url.clone(), cache_dir);
    config.poll_interval = Duration::from_millis(args.poll_interval_ms);
    config.debounce_window = Duration::from_millis(args.debounce_ms);

    info!("syncing week {} against {}", week, args.server_url);
    let sync = SyncLoop::start(config, week).await;
    info!("session {} started", sync.client_id().await);

    let mut last_seen = 0u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
            _ = tokio::time::sleep(Duration::from_millis(500)) => {
                let version = sync.sync_version().await;
                if version != last_seen {
                    last_seen = version;
                    let doc = sync.snapshot().await;
                    info!(
                        version,
                        people = doc.people.len(),
                        sites = doc.sites.len(),
                        assignments = doc.assignments.len(),
                        quotes = doc.quotes.len(),
                        "planning state updated"
                    );
                }
            }
        }
    }

    ExitCode::SUCCESS
}
