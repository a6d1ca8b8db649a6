use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the state gateway server
#[derive(Parser, Debug)]
#[clap(name = "planner-server")]
#[clap(about = "Week-keyed planner state gateway over blob storage", long_about = None)]
pub struct ServerArgs {
    /// Root directory for blob objects (in-memory store if omitted)
    #[clap(short, long, value_name = "DIR")]
    pub blob_root: Option<PathBuf>,

    /// Port to listen on
    #[clap(short, long, default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,
}

/// CLI arguments for the headless sync session
#[derive(Parser, Debug)]
#[clap(name = "planner-sync")]
#[clap(about = "Synchronize a planning session against a state gateway", long_about = None)]
pub struct SyncArgs {
    /// Base URL of the state gateway
    #[clap(long, default_value = "http://127.0.0.1:3000", value_name = "URL")]
    pub server_url: String,

    /// Week to view, e.g. 2025-W45 (defaults to the current week)
    #[clap(short, long, value_name = "WEEK_KEY")]
    pub week: Option<String>,

    /// Directory for the local document cache (a temp dir if omitted)
    #[clap(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[clap(long, default_value = "1000", value_name = "MS")]
    pub poll_interval_ms: u64,

    /// Save debounce window in milliseconds
    #[clap(long, default_value = "600", value_name = "MS")]
    pub debounce_ms: u64,
}
