pub mod blob;
pub mod cli;
pub mod document;
pub mod gateway;
pub mod sync;
pub mod week;

use axum::{routing::get, Router};
use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
use gateway::StateGateway;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

async fn health_check() -> &'static str {
    "OK"
}

/// Configuration for creating a router.
#[derive(Default)]
pub struct RouterConfig {
    /// Root directory for blob objects. When absent the server runs on an
    /// in-memory store and state does not survive restarts.
    pub blob_root: Option<PathBuf>,
}

/// Create a router over an existing blob store.
pub fn create_router_with_store(store: Arc<dyn BlobStore>) -> Router {
    let gateway = Arc::new(StateGateway::new(store));
    Router::new()
        .route("/health", get(health_check))
        .merge(gateway::router(gateway))
        .layer(CorsLayer::permissive())
}

/// Create a router with the given configuration.
pub fn create_router_with_config(config: RouterConfig) -> Router {
    let store: Arc<dyn BlobStore> = match config.blob_root {
        Some(root) => Arc::new(FsBlobStore::new(root)),
        None => Arc::new(MemoryBlobStore::new()),
    };
    create_router_with_store(store)
}

pub fn create_router() -> Router {
    create_router_with_config(RouterConfig::default())
}
