// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Recording fetch outcomes and snapshot values

use crate::fetcher::FetchError;
use crate::metrics::labels::{AuthorizationLabels, MetricLabels};
use crate::provider::MetricType;
use crate::session::AccessOutcome;
use crate::snapshot::{FetchedValue, HealthSnapshot};

use super::MetricsRegistry;

impl MetricsRegistry {
    pub fn record_fetch(
        &self,
        metric: MetricType,
        result: &Result<FetchedValue, FetchError>,
        duration_secs: f64,
    ) {
        let labels = MetricLabels::from(metric);
        match result {
            Ok(_) => self.fetch_success.get_or_create(&labels).inc(),
            Err(FetchError::NoData) => self.fetch_no_data.get_or_create(&labels).inc(),
            Err(FetchError::Provider(_)) => self.fetch_errors.get_or_create(&labels).inc(),
        };
        #[allow(clippy::cast_possible_truncation)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.fetch_duration_milliseconds
            .get_or_create(&labels)
            .set(millis);
    }

    pub fn record_authorization(&self, outcome: &AccessOutcome) {
        self.authorization_requests
            .get_or_create(&AuthorizationLabels {
                outcome: outcome.as_str().to_string(),
            })
            .inc();
    }

    pub fn record_refresh_duration(&self, duration_secs: f64) {
        #[allow(clippy::cast_possible_truncation)]
        let millis = (duration_secs * 1000.0).round() as i64;
        self.refresh_cycle_duration_milliseconds.set(millis);
    }

    /// Copies the current snapshot values into the value gauges
    pub fn update_snapshot(&self, snapshot: &HealthSnapshot) {
        self.step_count.set(snapshot.step_count.value);
        self.heart_rate_bpm.set(snapshot.heart_rate.value);
        self.dietary_energy_kcal.set(snapshot.dietary_energy.value);

        let intervals = &snapshot.sleep_intervals.value;
        #[allow(clippy::cast_possible_wrap)]
        self.sleep_intervals.set(intervals.len() as i64);
        let seconds: i64 = intervals.iter().map(|i| i.duration().num_seconds()).sum();
        #[allow(clippy::cast_precision_loss)]
        self.sleep_minutes.set(seconds as f64 / 60.0);
    }
}
