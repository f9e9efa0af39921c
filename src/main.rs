use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use health_dashboard::{
    AppError, AppState, Config, DashboardSession, DashboardView, HealthProvider, InMemoryProvider,
    MetricsRegistry, ProviderFixture, Result, SnapshotStore, create_router, spawn_renderer,
    start_session_loop,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env();
    config.validate().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        AppError::Config(e)
    })?;

    tracing::info!(
        "Loaded configuration (offset {}, fetch timeout {}s)",
        config.utc_offset,
        config.fetch_timeout_secs
    );

    let provider = build_provider(&config)?;

    // Snapshot store: the only writer of dashboard state
    let (store, updater, subscription) = SnapshotStore::new();
    let metrics = MetricsRegistry::new();

    // Fails fast when the provider lacks a required metric type
    let session = Arc::new(
        DashboardSession::new(provider, updater, metrics.clone(), &config).map_err(|e| {
            tracing::error!("{}", e);
            e
        })?,
    );

    // Shutdown channel tied to the dashboard lifetime
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Wait for Ctrl+C
    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let store_handle = store.spawn(shutdown_rx.clone());

    let (refresh_tx, refresh_rx) = mpsc::channel(1);
    let session_handle = start_session_loop(session, refresh_rx, shutdown_rx.clone());

    let renderer_handle = config.render_to_stdout.then(|| {
        spawn_renderer(
            DashboardView::new(config.utc_offset),
            subscription.clone(),
            tokio::io::stdout(),
            true,
            shutdown_rx.clone(),
        )
    });

    let state = Arc::new(AppState {
        config: config.clone(),
        metrics,
        snapshot: subscription,
        refresh_tx,
    });
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr.parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("Health dashboard listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /         - Dashboard");
    tracing::info!("  - GET  /snapshot - Snapshot JSON");
    tracing::info!("  - POST /refresh  - Re-fetch all metrics");
    tracing::info!("  - GET  /health   - Health check");
    tracing::info!("  - GET  /metrics  - Prometheus metrics");

    let mut server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
            tracing::info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    // The server may also stop on its own; tear everything else down with it
    let _ = shutdown_tx.send(true);
    let _ = session_handle.await;
    if let Some(handle) = renderer_handle {
        let _ = handle.await;
    }
    let _ = store_handle.await;

    Ok(())
}

fn build_provider(config: &Config) -> Result<Arc<dyn HealthProvider>> {
    let provider = match &config.fixture_path {
        Some(path) => {
            let fixture = ProviderFixture::load(path).map_err(|e| {
                tracing::error!("Failed to load fixture {}: {}", path.display(), e);
                e
            })?;
            let provider = InMemoryProvider::from_fixture(&fixture, Utc::now()).map_err(|e| {
                tracing::error!("Rejected fixture {}: {}", path.display(), e);
                e
            })?;
            tracing::info!("Using health fixture {}", path.display());
            provider
        }
        None => InMemoryProvider::new(),
    };
    Ok(Arc::new(provider))
}

fn setup_tracing() {
    // RUST_LOG wins; default to "info"
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
