// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Type definitions for health-data queries

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of health data read by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    StepCount,
    HeartRate,
    DietaryEnergy,
    SleepAnalysis,
}

impl MetricType {
    /// Every metric type the dashboard needs read access to
    pub const ALL: [MetricType; 4] = [
        MetricType::StepCount,
        MetricType::HeartRate,
        MetricType::DietaryEnergy,
        MetricType::SleepAnalysis,
    ];

    /// Unit the dashboard displays this metric in; `None` for category types
    #[must_use]
    pub fn display_unit(self) -> Option<HealthUnit> {
        match self {
            MetricType::StepCount => Some(HealthUnit::Count),
            MetricType::HeartRate => Some(HealthUnit::CountPerMinute),
            MetricType::DietaryEnergy => Some(HealthUnit::Kilocalorie),
            MetricType::SleepAnalysis => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::StepCount => "step_count",
            MetricType::HeartRate => "heart_rate",
            MetricType::DietaryEnergy => "dietary_energy",
            MetricType::SleepAnalysis => "sleep_analysis",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit attached to a quantity sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthUnit {
    Count,
    CountPerMinute,
    CountPerSecond,
    Kilocalorie,
    Kilojoule,
}

const KJ_PER_KCAL: f64 = 4.184;

impl HealthUnit {
    /// Converts `value` expressed in `self` into `target`.
    ///
    /// Returns `None` when the two units measure different dimensions.
    #[must_use]
    pub fn convert(self, value: f64, target: HealthUnit) -> Option<f64> {
        use HealthUnit::{CountPerMinute, CountPerSecond, Kilocalorie, Kilojoule};
        match (self, target) {
            (a, b) if a == b => Some(value),
            (CountPerSecond, CountPerMinute) => Some(value * 60.0),
            (CountPerMinute, CountPerSecond) => Some(value / 60.0),
            (Kilojoule, Kilocalorie) => Some(value / KJ_PER_KCAL),
            (Kilocalorie, Kilojoule) => Some(value * KJ_PER_KCAL),
            _ => None,
        }
    }
}

impl fmt::Display for HealthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthUnit::Count => "count",
            HealthUnit::CountPerMinute => "count/min",
            HealthUnit::CountPerSecond => "count/s",
            HealthUnit::Kilocalorie => "kcal",
            HealthUnit::Kilojoule => "kJ",
        };
        f.write_str(s)
    }
}

/// A numeric value with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: HealthUnit,
}

impl Quantity {
    #[must_use]
    pub fn new(value: f64, unit: HealthUnit) -> Self {
        Self { value, unit }
    }

    /// Value of this quantity expressed in `unit`
    #[must_use]
    pub fn value_in(&self, unit: HealthUnit) -> Option<f64> {
        self.unit.convert(self.value, unit)
    }
}

/// Half-open time range `[start, end)` used as a query predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From local midnight (in `offset`) up to `now`
    #[must_use]
    pub fn start_of_day(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local_midnight = now
            .with_timezone(&offset)
            .date_naive()
            .and_time(NaiveTime::MIN);
        // Fixed offsets never produce ambiguous or skipped local times
        let start = offset
            .from_local_datetime(&local_midnight)
            .single()
            .map_or(now, |dt| dt.with_timezone(&Utc));
        Self { start, end: now }
    }

    /// The 24 hours leading up to `now`
    #[must_use]
    pub fn past_day(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(1),
            end: now,
        }
    }

    /// Strict start-date predicate: the sample must start inside the window
    #[must_use]
    pub fn contains_start(&self, sample_start: DateTime<Utc>) -> bool {
        sample_start >= self.start && sample_start < self.end
    }
}

/// A single discrete record returned by a sample query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub metric: MetricType,
    /// Present for quantity types, absent for category types such as sleep
    pub quantity: Option<Quantity>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Aggregation operation for statistics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    CumulativeSum,
}

/// Statistics query over a metric type and a time window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateQuery {
    pub metric: MetricType,
    pub window: TimeWindow,
    pub aggregation: Aggregation,
    /// Unit in which the aggregate is returned
    pub unit: HealthUnit,
}

/// Ordering applied by the provider to sample query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSort {
    EndDateDescending,
}

/// Sample query over a metric type and a time window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleQuery {
    pub metric: MetricType,
    pub window: TimeWindow,
    /// `None` means no limit
    pub limit: Option<usize>,
    /// `None` keeps the provider's default order
    pub sort: Option<SampleSort>,
}

/// Result of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Granted,
    Denied,
}
