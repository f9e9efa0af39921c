// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Metric fetching
//!
//! One read-only query per metric type. Each operation takes the time window
//! explicitly; [`window_for`] picks the window the dashboard uses.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::provider::{
    AggregateQuery, Aggregation, HealthProvider, HealthUnit, MetricType, ProviderError,
    SampleQuery, SampleSort, TimeWindow,
};
use crate::snapshot::{FetchedValue, SleepInterval};

/// Why a fetch produced no value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The provider returned nothing for the window
    #[error("no data available")]
    NoData,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Query window used for `metric` at `now`
///
/// Cumulative metrics cover the local day so far; sample metrics cover the past 24h.
#[must_use]
pub fn window_for(metric: MetricType, now: DateTime<Utc>, offset: FixedOffset) -> TimeWindow {
    match metric {
        MetricType::StepCount | MetricType::DietaryEnergy => TimeWindow::start_of_day(now, offset),
        MetricType::HeartRate | MetricType::SleepAnalysis => TimeWindow::past_day(now),
    }
}

/// Issues metric queries against a health provider
#[derive(Clone)]
pub struct MetricFetcher {
    provider: Arc<dyn HealthProvider>,
}

impl MetricFetcher {
    #[must_use]
    pub fn new(provider: Arc<dyn HealthProvider>) -> Self {
        Self { provider }
    }

    /// Dispatches to the fetch operation for `metric` using `window`
    pub async fn fetch(
        &self,
        metric: MetricType,
        window: TimeWindow,
    ) -> Result<FetchedValue, FetchError> {
        match metric {
            MetricType::StepCount => self.fetch_step_count(window).await.map(FetchedValue::Scalar),
            MetricType::HeartRate => self
                .fetch_latest_heart_rate(window)
                .await
                .map(FetchedValue::Scalar),
            MetricType::DietaryEnergy => self
                .fetch_dietary_energy(window)
                .await
                .map(FetchedValue::Scalar),
            MetricType::SleepAnalysis => self
                .fetch_sleep_intervals(window)
                .await
                .map(FetchedValue::Intervals),
        }
    }

    /// Total step count inside `window`
    pub async fn fetch_step_count(&self, window: TimeWindow) -> Result<f64, FetchError> {
        self.cumulative_sum(MetricType::StepCount, window, HealthUnit::Count)
            .await
    }

    /// Heart rate of the sample with the latest end time inside `window`, in beats/min
    pub async fn fetch_latest_heart_rate(&self, window: TimeWindow) -> Result<f64, FetchError> {
        let samples = self
            .provider
            .samples(SampleQuery {
                metric: MetricType::HeartRate,
                window,
                limit: Some(1),
                sort: Some(SampleSort::EndDateDescending),
            })
            .await?;

        // Providers that ignore the sort still yield the latest reading
        let latest = samples
            .iter()
            .filter_map(|s| s.quantity.map(|q| (s.end, q)))
            .max_by_key(|(end, _)| *end)
            .ok_or(FetchError::NoData)?;

        let (_, quantity) = latest;
        quantity
            .value_in(HealthUnit::CountPerMinute)
            .ok_or(FetchError::Provider(ProviderError::IncompatibleUnit {
                from: quantity.unit,
                to: HealthUnit::CountPerMinute,
            }))
    }

    /// Total dietary energy inside `window`, in kcal
    pub async fn fetch_dietary_energy(&self, window: TimeWindow) -> Result<f64, FetchError> {
        self.cumulative_sum(MetricType::DietaryEnergy, window, HealthUnit::Kilocalorie)
            .await
    }

    /// Sleep intervals starting inside `window`, in provider order
    ///
    /// An empty result is a valid answer, not [`FetchError::NoData`].
    pub async fn fetch_sleep_intervals(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<SleepInterval>, FetchError> {
        let samples = self
            .provider
            .samples(SampleQuery {
                metric: MetricType::SleepAnalysis,
                window,
                limit: None,
                sort: None,
            })
            .await?;

        Ok(samples
            .into_iter()
            .map(|s| SleepInterval {
                start: s.start,
                end: s.end,
            })
            .collect())
    }

    async fn cumulative_sum(
        &self,
        metric: MetricType,
        window: TimeWindow,
        unit: HealthUnit,
    ) -> Result<f64, FetchError> {
        self.provider
            .aggregate(AggregateQuery {
                metric,
                window,
                aggregation: Aggregation::CumulativeSum,
                unit,
            })
            .await?
            .ok_or(FetchError::NoData)
    }
}
