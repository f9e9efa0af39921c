//! HTTP surface for the health dashboard
//!
//! # Endpoints
//! - `GET /` - rendered text dashboard
//! - `GET /snapshot` - current snapshot as JSON
//! - `POST /refresh` - re-run authorization and all fetches
//! - `GET /health` - health check
//! - `GET /metrics` - Prometheus metrics

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::config::Config;
use crate::metrics::MetricsRegistry;
use crate::snapshot::HealthSnapshot;
use crate::view::DashboardView;

/// Application state shared with endpoints
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsRegistry,
    /// Latest snapshot published by the store
    pub snapshot: watch::Receiver<HealthSnapshot>,
    /// Queues a refresh cycle
    pub refresh_tx: mpsc::Sender<()>,
}

impl AppState {
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView::new(self.config.utc_offset)
    }
}

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard_handler))
        .route("/snapshot", get(handlers::snapshot_handler))
        .route("/refresh", post(handlers::refresh_handler))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_router() {
        let (_snapshot_tx, snapshot) = watch::channel(HealthSnapshot::default());
        let (refresh_tx, _refresh_rx) = mpsc::channel(1);
        let state = Arc::new(AppState {
            config: Config::default(),
            metrics: MetricsRegistry::new(),
            snapshot,
            refresh_tx,
        });

        let _router = create_router(state);
        // If we get here without panicking, the router was created successfully
    }
}
