// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metrics registry and update logic

mod scrape;
mod update;

use crate::metrics::labels::{AuthorizationLabels, MetricLabels};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::Mutex;

type FloatGauge = Gauge<f64, AtomicU64>;

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    // snapshot values
    step_count: FloatGauge,
    heart_rate_bpm: FloatGauge,
    dietary_energy_kcal: FloatGauge,
    sleep_intervals: Gauge,
    sleep_minutes: FloatGauge,
    // fetch outcomes
    fetch_success: Family<MetricLabels, Counter>,
    fetch_no_data: Family<MetricLabels, Counter>,
    fetch_errors: Family<MetricLabels, Counter>,
    fetch_duration_milliseconds: Family<MetricLabels, Gauge>,
    // authorization and refresh cycles
    authorization_requests: Family<AuthorizationLabels, Counter>,
    refresh_cycle_duration_milliseconds: Gauge,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("health_dashboard");

        let step_count = FloatGauge::default();
        registry.register(
            "step_count",
            "Steps since local midnight",
            step_count.clone(),
        );
        let heart_rate_bpm = FloatGauge::default();
        registry.register(
            "heart_rate_bpm",
            "Latest heart rate in beats per minute",
            heart_rate_bpm.clone(),
        );
        let dietary_energy_kcal = FloatGauge::default();
        registry.register(
            "dietary_energy_kcal",
            "Dietary energy consumed since local midnight",
            dietary_energy_kcal.clone(),
        );
        let sleep_intervals = Gauge::default();
        registry.register(
            "sleep_intervals",
            "Sleep intervals recorded in the past 24 hours",
            sleep_intervals.clone(),
        );
        let sleep_minutes = FloatGauge::default();
        registry.register(
            "sleep_minutes",
            "Total sleep minutes recorded in the past 24 hours",
            sleep_minutes.clone(),
        );

        let fetch_success = Family::<MetricLabels, Counter>::default();
        registry.register(
            "fetch_success",
            "Successful metric fetches",
            fetch_success.clone(),
        );
        let fetch_no_data = Family::<MetricLabels, Counter>::default();
        registry.register(
            "fetch_no_data",
            "Metric fetches that found no data in their window",
            fetch_no_data.clone(),
        );
        let fetch_errors = Family::<MetricLabels, Counter>::default();
        registry.register(
            "fetch_errors",
            "Metric fetches that failed",
            fetch_errors.clone(),
        );
        let fetch_duration_milliseconds = Family::<MetricLabels, Gauge>::default();
        registry.register(
            "fetch_duration_milliseconds",
            "Duration of the last fetch per metric",
            fetch_duration_milliseconds.clone(),
        );

        let authorization_requests = Family::<AuthorizationLabels, Counter>::default();
        registry.register(
            "authorization_requests",
            "Authorization requests by outcome",
            authorization_requests.clone(),
        );
        let refresh_cycle_duration_milliseconds = Gauge::default();
        registry.register(
            "refresh_cycle_duration_milliseconds",
            "Duration of the last full refresh cycle",
            refresh_cycle_duration_milliseconds.clone(),
        );

        Self {
            registry: Arc::new(Mutex::new(registry)),
            step_count,
            heart_rate_bpm,
            dietary_energy_kcal,
            sleep_intervals,
            sleep_minutes,
            fetch_success,
            fetch_no_data,
            fetch_errors,
            fetch_duration_milliseconds,
            authorization_requests,
            refresh_cycle_duration_milliseconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::provider::{MetricType, ProviderError};
    use crate::session::AccessOutcome;
    use crate::snapshot::{FetchedValue, HealthSnapshot, SleepInterval};
    use chrono::{Duration, Utc};

    #[test]
    fn test_record_fetch_outcomes() {
        let registry = MetricsRegistry::new();
        let labels = MetricLabels::from(MetricType::StepCount);

        registry.record_fetch(
            MetricType::StepCount,
            &Ok(FetchedValue::Scalar(10.0)),
            0.012,
        );
        registry.record_fetch(MetricType::StepCount, &Err(FetchError::NoData), 0.001);
        registry.record_fetch(
            MetricType::StepCount,
            &Err(FetchError::Provider(ProviderError::Unavailable(
                "x".to_string(),
            ))),
            1.234,
        );

        assert_eq!(registry.fetch_success.get_or_create(&labels).get(), 1);
        assert_eq!(registry.fetch_no_data.get_or_create(&labels).get(), 1);
        assert_eq!(registry.fetch_errors.get_or_create(&labels).get(), 1);
        assert_eq!(
            registry.fetch_duration_milliseconds.get_or_create(&labels).get(),
            1234
        );
    }

    #[test]
    fn test_record_authorization_by_outcome() {
        let registry = MetricsRegistry::new();
        registry.record_authorization(&AccessOutcome::Granted);
        registry.record_authorization(&AccessOutcome::Granted);
        registry.record_authorization(&AccessOutcome::Error("offline".to_string()));

        let granted = AuthorizationLabels {
            outcome: "granted".to_string(),
        };
        let error = AuthorizationLabels {
            outcome: "error".to_string(),
        };
        assert_eq!(registry.authorization_requests.get_or_create(&granted).get(), 2);
        assert_eq!(registry.authorization_requests.get_or_create(&error).get(), 1);
    }

    #[test]
    fn test_update_snapshot_sets_gauges() {
        let registry = MetricsRegistry::new();
        let end = Utc::now();
        let mut snapshot = HealthSnapshot::default();
        snapshot.step_count.value = 1234.0;
        snapshot.heart_rate.value = 72.34;
        snapshot.dietary_energy.value = 455.6;
        snapshot.sleep_intervals.value = vec![
            SleepInterval {
                start: end - Duration::minutes(90),
                end,
            },
            SleepInterval {
                start: end - Duration::minutes(300),
                end: end - Duration::minutes(120),
            },
        ];

        registry.update_snapshot(&snapshot);

        assert_eq!(registry.step_count.get(), 1234.0);
        assert_eq!(registry.heart_rate_bpm.get(), 72.34);
        assert_eq!(registry.dietary_energy_kcal.get(), 455.6);
        assert_eq!(registry.sleep_intervals.get(), 2);
        assert_eq!(registry.sleep_minutes.get(), 270.0);
    }

    #[test]
    fn test_record_refresh_duration() {
        let registry = MetricsRegistry::new();
        registry.record_refresh_duration(0.25);
        assert_eq!(registry.refresh_cycle_duration_milliseconds.get(), 250);
    }

    #[tokio::test]
    async fn test_encode_metrics_contains_expected_names() {
        let registry = MetricsRegistry::new();
        registry.record_fetch(
            MetricType::HeartRate,
            &Ok(FetchedValue::Scalar(60.0)),
            0.01,
        );
        registry.record_authorization(&AccessOutcome::Denied);
        registry.update_snapshot(&HealthSnapshot::default());

        let encoded = registry.encode_metrics().await.expect("Failed to encode");

        assert!(encoded.contains("health_dashboard_step_count"));
        assert!(encoded.contains("health_dashboard_heart_rate_bpm"));
        assert!(encoded.contains("health_dashboard_fetch_success_total"));
        assert!(encoded.contains("metric=\"heart_rate\""));
        assert!(encoded.contains("outcome=\"denied\""));
    }
}
