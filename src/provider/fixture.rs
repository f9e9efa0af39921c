// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! JSON fixture format for the in-memory provider

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::types::{HealthUnit, MetricType, Quantity, Sample};
use crate::error::{AppError, Result};

/// How the provider answers permission requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationPolicy {
    #[default]
    Granted,
    Denied,
    /// The permission request itself fails with this reason
    Error(String),
}

/// Sample timing, either absolute or relative to the time the fixture is loaded
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SampleTiming {
    Absolute {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Relative {
        minutes_ago: i64,
        #[serde(default)]
        duration_minutes: i64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureSample {
    #[serde(default)]
    pub value: Option<f64>,
    /// Defaults to the metric's display unit
    #[serde(default)]
    pub unit: Option<HealthUnit>,
    #[serde(flatten)]
    pub timing: SampleTiming,
}

/// Contents of a `HEALTH_FIXTURE` file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFixture {
    #[serde(default)]
    pub authorization: AuthorizationPolicy,
    /// Defaults to every metric type
    #[serde(default)]
    pub supported: Option<Vec<MetricType>>,
    #[serde(default)]
    pub samples: BTreeMap<MetricType, Vec<FixtureSample>>,
    /// Artificial per-metric query latency
    #[serde(default)]
    pub latency_ms: BTreeMap<MetricType, u64>,
}

impl ProviderFixture {
    /// Reads and parses a fixture file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let fixture = serde_json::from_str(&raw)?;
        tracing::debug!("Loaded provider fixture from {}", path.display());
        Ok(fixture)
    }

    /// Resolves fixture samples into provider samples, anchoring relative timings at `now`.
    ///
    /// Fails on negative values and on relative timings outside the representable range.
    pub fn resolve_samples(&self, now: DateTime<Utc>) -> Result<Vec<Sample>> {
        let mut resolved = Vec::new();
        for (metric, samples) in &self.samples {
            for sample in samples {
                let (start, end) = match sample.timing {
                    SampleTiming::Absolute { start, end } => (start, end),
                    SampleTiming::Relative {
                        minutes_ago,
                        duration_minutes,
                    } => relative_interval(now, minutes_ago, duration_minutes).ok_or_else(|| {
                        AppError::InvalidFixture(format!(
                            "{metric} sample timing out of range \
                             (minutes_ago {minutes_ago}, duration_minutes {duration_minutes})"
                        ))
                    })?,
                };
                let quantity = match (sample.value, sample.unit.or(metric.display_unit())) {
                    (Some(value), _) if !value.is_finite() || value < 0.0 => {
                        return Err(AppError::InvalidFixture(format!(
                            "{metric} sample value {value} must be a non-negative number"
                        )));
                    }
                    (Some(value), Some(unit)) => Some(Quantity::new(value, unit)),
                    _ => None,
                };
                resolved.push(Sample {
                    metric: *metric,
                    quantity,
                    start,
                    end,
                });
            }
        }
        Ok(resolved)
    }
}

fn relative_interval(
    now: DateTime<Utc>,
    minutes_ago: i64,
    duration_minutes: i64,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = now.checked_sub_signed(TimeDelta::try_minutes(minutes_ago)?)?;
    let end = start.checked_add_signed(TimeDelta::try_minutes(duration_minutes)?)?;
    Some((start, end))
}
