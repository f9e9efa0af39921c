// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Dashboard session orchestration
//!
//! A refresh cycle asks the authorization gate for read access and, when granted,
//! runs the four metric fetches concurrently. Cycles run once when the dashboard
//! starts and again on every refresh request. Shutting the dashboard down aborts
//! any fetches still in flight.

mod fetch_task;
mod gate;

use chrono::{FixedOffset, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetcher::{MetricFetcher, window_for};
use crate::metrics::MetricsRegistry;
use crate::provider::{HealthProvider, MetricType};
use crate::snapshot::{SnapshotUpdate, SnapshotUpdater};

use fetch_task::{FetchJob, spawn_metric_fetch};

pub use gate::{AccessOutcome, AuthorizationGate};

/// Fails when the provider cannot serve every metric type in `required`
pub fn verify_supported_types(provider: &dyn HealthProvider, required: &[MetricType]) -> Result<()> {
    let supported = provider.supported_types();
    let missing: Vec<&str> = required
        .iter()
        .filter(|metric| !supported.contains(metric))
        .map(|metric| metric.as_str())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Config(format!(
            "provider does not support required metric type(s): {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Resolves once shutdown is requested or the shutdown sender is gone
pub(crate) async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow_and_update() {
            return;
        }
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Everything a refresh cycle needs
pub struct DashboardSession {
    gate: AuthorizationGate,
    fetcher: MetricFetcher,
    updater: SnapshotUpdater,
    metrics: MetricsRegistry,
    utc_offset: FixedOffset,
    fetch_timeout: Duration,
}

impl DashboardSession {
    /// Creates a session after checking the provider supports every metric type
    pub fn new(
        provider: Arc<dyn HealthProvider>,
        updater: SnapshotUpdater,
        metrics: MetricsRegistry,
        config: &Config,
    ) -> Result<Self> {
        verify_supported_types(provider.as_ref(), &MetricType::ALL)?;

        Ok(Self {
            gate: AuthorizationGate::new(provider.clone()),
            fetcher: MetricFetcher::new(provider),
            updater,
            metrics,
            utc_offset: config.utc_offset,
            fetch_timeout: config.fetch_timeout(),
        })
    }

    /// Runs one authorization + fetch cycle and waits for every fetch to finish.
    ///
    /// Dropping the returned future aborts fetches still in flight.
    pub async fn refresh(&self) -> AccessOutcome {
        let cycle_start = std::time::Instant::now();

        let outcome = self.gate.request_access(&MetricType::ALL).await;
        self.metrics.record_authorization(&outcome);
        if !self
            .updater
            .send(SnapshotUpdate::Authorization(outcome.status()))
            .await
        {
            return outcome;
        }
        if !outcome.is_granted() {
            // Fields keep their current values; the published status explains why
            return outcome;
        }

        let now = Utc::now();
        let mut tasks = JoinSet::new();
        for metric in MetricType::ALL {
            spawn_metric_fetch(
                &mut tasks,
                FetchJob {
                    metric,
                    window: window_for(metric, now, self.utc_offset),
                },
                self.fetcher.clone(),
                self.updater.clone(),
                self.metrics.clone(),
                self.fetch_timeout,
            );
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Fetch task failed: {}", e);
            }
        }

        let elapsed = cycle_start.elapsed().as_secs_f64();
        self.metrics.record_refresh_duration(elapsed);
        tracing::debug!("Refresh cycle completed in {:.3}s", elapsed);
        outcome
    }
}

/// Starts the session loop: one refresh immediately, then one per request on `refresh_rx`
pub fn start_session_loop(
    session: Arc<DashboardSession>,
    mut refresh_rx: mpsc::Receiver<()>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tracing::info!("Starting dashboard session");

    tokio::spawn(async move {
        let mut refresh_pending = true;
        loop {
            if refresh_pending {
                refresh_pending = false;
                tokio::select! {
                    outcome = session.refresh() => {
                        tracing::debug!("Refresh finished with access {}", outcome.as_str());
                    },
                    () = shutdown_requested(&mut shutdown_rx) => {
                        tracing::info!("Dashboard closed during refresh, cancelling fetches");
                        break;
                    }
                }
            }

            tokio::select! {
                request = refresh_rx.recv() => {
                    if request.is_none() {
                        tracing::debug!("Refresh channel closed");
                        break;
                    }
                    tracing::info!("Refresh requested");
                    refresh_pending = true;
                },
                () = shutdown_requested(&mut shutdown_rx) => {
                    tracing::info!("Stopping dashboard session");
                    break;
                }
            }
        }
    })
}
