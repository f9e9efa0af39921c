// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Per-metric fetch task

use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::fetcher::{FetchError, MetricFetcher};
use crate::metrics::MetricsRegistry;
use crate::provider::{MetricType, ProviderError, TimeWindow};
use crate::snapshot::{SnapshotUpdate, SnapshotUpdater};

pub(super) struct FetchJob {
    pub metric: MetricType,
    pub window: TimeWindow,
}

/// Spawns one fetch into `tasks`; the completion is delivered to the store as a message
pub(super) fn spawn_metric_fetch(
    tasks: &mut JoinSet<()>,
    job: FetchJob,
    fetcher: MetricFetcher,
    updater: SnapshotUpdater,
    metrics: MetricsRegistry,
    timeout: Duration,
) {
    tasks.spawn(async move {
        let FetchJob { metric, window } = job;
        if !updater.send(SnapshotUpdate::FetchStarted(metric)).await {
            return;
        }

        tracing::trace!("Starting fetch for {}", metric);
        let start = std::time::Instant::now();
        let result = match tokio::time::timeout(timeout, fetcher.fetch(metric, window)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Provider(ProviderError::Unavailable(format!(
                "timed out after {}s",
                timeout.as_secs()
            )))),
        };
        let duration = start.elapsed().as_secs_f64();
        metrics.record_fetch(metric, &result, duration);

        match &result {
            Ok(value) => {
                tracing::debug!("Fetched {} in {:.3}s", metric, duration);
                tracing::trace!("{} value: {:?}", metric, value);
            }
            Err(FetchError::NoData) => {
                tracing::info!("No {} data available in window", metric);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {} in {:.3}s: {}", metric, duration, e);
            }
        }

        if !updater.is_live() {
            tracing::debug!("Dashboard closed before {} fetch completed", metric);
            return;
        }
        updater
            .send(SnapshotUpdate::FetchCompleted {
                metric,
                result,
                at: Utc::now(),
            })
            .await;
    });
}
