// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Health snapshot and its single-writer store
//!
//! [`HealthSnapshot`] holds the latest fetched value of every metric together with
//! a per-metric status, so a view can tell "zero steps" apart from "fetch failed".
//! Only the [`SnapshotStore`] task mutates it; everything else sends
//! [`SnapshotUpdate`] messages and observes published copies.

mod store;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::fetcher::FetchError;
use crate::provider::MetricType;

pub use store::{SnapshotStore, SnapshotUpdater};

/// A time-bounded sleep record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepInterval {
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Value produced by a successful fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedValue {
    Scalar(f64),
    Intervals(Vec<SleepInterval>),
}

/// Freshness of a single snapshot field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum MetricStatus {
    /// Never fetched
    #[default]
    Idle,
    Loading,
    Ready,
    /// The provider had nothing for the window; the value is unchanged
    NoData,
    /// The fetch failed; the value is unchanged
    Failed(String),
}

/// Outcome of the most recent permission request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    Pending,
    Granted,
    Denied,
    Failed(String),
}

/// A snapshot field: the last good value plus its status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricState<T> {
    pub value: T,
    pub status: MetricStatus,
    /// When `value` was last set by a successful fetch
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> MetricState<T> {
    fn set(&mut self, value: T, at: DateTime<Utc>) {
        self.value = value;
        self.status = MetricStatus::Ready;
        self.updated_at = Some(at);
    }
}

/// In-memory set of the latest fetched values driving the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthSnapshot {
    /// Steps since local midnight
    pub step_count: MetricState<f64>,
    /// Latest heart rate in beats/min
    pub heart_rate: MetricState<f64>,
    /// Dietary energy since local midnight in kcal
    pub dietary_energy: MetricState<f64>,
    /// Sleep intervals over the past 24h
    pub sleep_intervals: MetricState<Vec<SleepInterval>>,
    pub authorization: AuthorizationStatus,
}

/// Message sent to the snapshot store
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotUpdate {
    Authorization(AuthorizationStatus),
    FetchStarted(MetricType),
    FetchCompleted {
        metric: MetricType,
        result: Result<FetchedValue, FetchError>,
        at: DateTime<Utc>,
    },
}

impl HealthSnapshot {
    /// Status of the field backing `metric`
    #[must_use]
    pub fn status(&self, metric: MetricType) -> &MetricStatus {
        match metric {
            MetricType::StepCount => &self.step_count.status,
            MetricType::HeartRate => &self.heart_rate.status,
            MetricType::DietaryEnergy => &self.dietary_energy.status,
            MetricType::SleepAnalysis => &self.sleep_intervals.status,
        }
    }

    fn status_mut(&mut self, metric: MetricType) -> &mut MetricStatus {
        match metric {
            MetricType::StepCount => &mut self.step_count.status,
            MetricType::HeartRate => &mut self.heart_rate.status,
            MetricType::DietaryEnergy => &mut self.dietary_energy.status,
            MetricType::SleepAnalysis => &mut self.sleep_intervals.status,
        }
    }

    fn scalar_mut(&mut self, metric: MetricType) -> Option<&mut MetricState<f64>> {
        match metric {
            MetricType::StepCount => Some(&mut self.step_count),
            MetricType::HeartRate => Some(&mut self.heart_rate),
            MetricType::DietaryEnergy => Some(&mut self.dietary_energy),
            MetricType::SleepAnalysis => None,
        }
    }

    /// Applies one update and reports whether anything changed.
    ///
    /// Each fetch touches only its own field. Failures keep the previous value
    /// and record the reason in the field status.
    pub fn apply(&mut self, update: SnapshotUpdate) -> bool {
        let before = self.clone();
        match update {
            SnapshotUpdate::Authorization(status) => self.authorization = status,
            SnapshotUpdate::FetchStarted(metric) => *self.status_mut(metric) = MetricStatus::Loading,
            SnapshotUpdate::FetchCompleted { metric, result, at } => match result {
                Ok(FetchedValue::Scalar(value)) => match self.scalar_mut(metric) {
                    Some(field) => field.set(value, at),
                    None => {
                        tracing::warn!("Ignoring scalar value for {}", metric);
                        return false;
                    }
                },
                Ok(FetchedValue::Intervals(intervals)) => {
                    if metric != MetricType::SleepAnalysis {
                        tracing::warn!("Ignoring interval list for {}", metric);
                        return false;
                    }
                    self.sleep_intervals.set(intervals, at);
                }
                Err(FetchError::NoData) => *self.status_mut(metric) = MetricStatus::NoData,
                Err(FetchError::Provider(e)) => {
                    *self.status_mut(metric) = MetricStatus::Failed(e.to_string());
                }
            },
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-23T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn completed(metric: MetricType, result: Result<FetchedValue, FetchError>) -> SnapshotUpdate {
        SnapshotUpdate::FetchCompleted {
            metric,
            result,
            at: at(),
        }
    }

    fn interval() -> SleepInterval {
        SleepInterval {
            start: at() - Duration::hours(10),
            end: at() - Duration::hours(3),
        }
    }

    #[test]
    fn test_default_snapshot_is_zero_and_empty() {
        let snapshot = HealthSnapshot::default();
        assert_eq!(snapshot.step_count.value, 0.0);
        assert_eq!(snapshot.heart_rate.value, 0.0);
        assert_eq!(snapshot.dietary_energy.value, 0.0);
        assert!(snapshot.sleep_intervals.value.is_empty());
        assert_eq!(snapshot.authorization, AuthorizationStatus::Pending);
        for metric in MetricType::ALL {
            assert_eq!(snapshot.status(metric), &MetricStatus::Idle);
        }
    }

    #[test]
    fn test_each_fetch_updates_only_its_field() {
        let cases = [
            (MetricType::StepCount, FetchedValue::Scalar(1234.0)),
            (MetricType::HeartRate, FetchedValue::Scalar(72.3)),
            (MetricType::DietaryEnergy, FetchedValue::Scalar(455.6)),
            (
                MetricType::SleepAnalysis,
                FetchedValue::Intervals(vec![interval()]),
            ),
        ];

        for (metric, value) in cases {
            let mut snapshot = HealthSnapshot::default();
            assert!(snapshot.apply(completed(metric, Ok(value))));

            let mut expected = HealthSnapshot::default();
            match metric {
                MetricType::StepCount => expected.step_count.set(1234.0, at()),
                MetricType::HeartRate => expected.heart_rate.set(72.3, at()),
                MetricType::DietaryEnergy => expected.dietary_energy.set(455.6, at()),
                MetricType::SleepAnalysis => expected.sleep_intervals.set(vec![interval()], at()),
            }
            assert_eq!(snapshot, expected, "unexpected snapshot after {metric} fetch");
        }
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let mut snapshot = HealthSnapshot::default();
        snapshot.apply(completed(
            MetricType::StepCount,
            Ok(FetchedValue::Scalar(800.0)),
        ));

        snapshot.apply(completed(
            MetricType::StepCount,
            Err(FetchError::Provider(ProviderError::Unavailable(
                "store locked".to_string(),
            ))),
        ));

        assert_eq!(snapshot.step_count.value, 800.0);
        assert_eq!(
            snapshot.step_count.status,
            MetricStatus::Failed("store locked".to_string())
        );
        assert_eq!(snapshot.step_count.updated_at, Some(at()));
    }

    #[test]
    fn test_no_data_marks_status_only() {
        let mut snapshot = HealthSnapshot::default();
        assert!(snapshot.apply(completed(MetricType::HeartRate, Err(FetchError::NoData))));
        assert_eq!(snapshot.heart_rate.value, 0.0);
        assert_eq!(snapshot.heart_rate.status, MetricStatus::NoData);
        assert!(snapshot.heart_rate.updated_at.is_none());
    }

    #[test]
    fn test_fetch_started_marks_loading() {
        let mut snapshot = HealthSnapshot::default();
        snapshot.apply(SnapshotUpdate::FetchStarted(MetricType::DietaryEnergy));
        assert_eq!(snapshot.dietary_energy.status, MetricStatus::Loading);
        assert_eq!(snapshot.step_count.status, MetricStatus::Idle);
    }

    #[test]
    fn test_mismatched_value_is_ignored() {
        let mut snapshot = HealthSnapshot::default();
        assert!(!snapshot.apply(completed(
            MetricType::SleepAnalysis,
            Ok(FetchedValue::Scalar(3.0)),
        )));
        assert!(!snapshot.apply(completed(
            MetricType::StepCount,
            Ok(FetchedValue::Intervals(vec![])),
        )));
        assert_eq!(snapshot, HealthSnapshot::default());
    }

    #[test]
    fn test_repeated_update_reports_no_change() {
        let mut snapshot = HealthSnapshot::default();
        let update = SnapshotUpdate::Authorization(AuthorizationStatus::Granted);
        assert!(snapshot.apply(update.clone()));
        assert!(!snapshot.apply(update));
    }

    #[test]
    fn test_snapshot_serializes_status() {
        let mut snapshot = HealthSnapshot::default();
        snapshot.apply(completed(
            MetricType::HeartRate,
            Err(FetchError::Provider(ProviderError::Unavailable(
                "offline".to_string(),
            ))),
        ));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["heart_rate"]["status"]["state"], "failed");
        assert_eq!(json["heart_rate"]["status"]["reason"], "offline");
        assert_eq!(json["step_count"]["status"]["state"], "idle");
        assert_eq!(json["authorization"]["state"], "pending");
    }
}
