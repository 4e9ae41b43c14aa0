use axum::{
    Router,
    extract::Extension,
    routing::{delete, get, post},
};
use nightlife_core::clustering::engine::ClusterRouter;
use nightlife_core::clustering::handlers::{ENDPOINT_MAP_CLUSTERS, handle_compute_clusters};
use nightlife_core::config::{AppConfig, CliOverrides, USAGE};
use nightlife_core::queue::connectivity::{ConnectivityMonitor, spawn_auto_sync};
use nightlife_core::queue::handlers::*;
use nightlife_core::queue::protocol::*;
use nightlife_core::queue::queue::ActionQueue;
use nightlife_core::queue::registry::ActionHandlerRegistry;
use nightlife_core::remote::http::HttpRemoteService;
use nightlife_core::remote::service::register_remote_handlers;
use nightlife_core::storage::file::FileStore;
use nightlife_core::storage::store::ActionStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("nightlife-node");
    let overrides = CliOverrides::parse(args.get(1..).unwrap_or(&[]))?;

    if overrides.help {
        println!("Usage: {} {}", program, USAGE);
        println!("Example: {} --bind 127.0.0.1:7070 --remote http://127.0.0.1:54321", program);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_max_level(if overrides.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    // 1. Configuration: file first, then command-line overrides.
    let mut config = AppConfig::load(overrides.config_path.as_deref())?;
    overrides.apply(&mut config);
    config.validate()?;

    tracing::info!("Starting nightlife node on {}", config.bind);
    tracing::info!("Remote backend: {}", config.remote.base_url);

    // 2. Local store and remote handlers:
    let store = Arc::new(FileStore::open(&config.store_path)?);
    tracing::info!("Action store: {}", store.path().display());

    let registry = ActionHandlerRegistry::new();
    register_remote_handlers(&registry, Arc::new(HttpRemoteService::new(&config.remote)));

    // 3. Queue and the explicit connectivity subscription:
    let monitor = ConnectivityMonitor::new(config.start_online);
    let queue = Arc::new(ActionQueue::new(
        store.clone(),
        registry,
        monitor.clone(),
        config.queue.clone(),
    ));
    let auto_sync = spawn_auto_sync(queue.clone(), &monitor);

    let cluster_router = Arc::new(ClusterRouter::new(config.clustering.clone()));

    // 4. HTTP Router:
    let app = Router::new()
        .route(ENDPOINT_ACTIONS, post(handle_enqueue_action).get(handle_list_pending))
        .route(ENDPOINT_ACTION_BY_ID, delete(handle_remove_action))
        .route(ENDPOINT_SYNC, post(handle_sync))
        .route(
            ENDPOINT_CONNECTIVITY,
            get(handle_get_connectivity).put(handle_set_connectivity),
        )
        .route(ENDPOINT_MAP_CLUSTERS, post(handle_compute_clusters))
        .layer(Extension(queue))
        .layer(Extension(monitor))
        .layer(Extension(cluster_router));

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested");
        })
        .await?;

    auto_sync.abort();
    store.close()?;

    Ok(())
}
