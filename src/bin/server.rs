use clap::Parser;
use planner_state::{cli::ServerArgs, create_router_with_config, RouterConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = ServerArgs::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planner_state=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(ref root) = args.blob_root {
        tracing::info!("Using blob root at: {}", root.display());
    } else {
        tracing::warn!("No blob root specified - state will not survive restarts");
        tracing::warn!("Use --blob-root <dir> to enable persistent storage");
    }

    // Build our application with routes
    let app = create_router_with_config(RouterConfig {
        blob_root: args.blob_root,
    });

    // Run the server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
