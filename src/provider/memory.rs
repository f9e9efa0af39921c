// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! In-memory health store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;

use super::fixture::{AuthorizationPolicy, ProviderFixture};
use super::types::{
    AggregateQuery, Aggregation, AuthorizationOutcome, MetricType, Sample, SampleQuery, SampleSort,
};
use super::{HealthProvider, ProviderError};

/// Health provider backed by a list of samples held in memory
pub struct InMemoryProvider {
    policy: AuthorizationPolicy,
    supported: Vec<MetricType>,
    samples: RwLock<Vec<Sample>>,
    granted: RwLock<HashSet<MetricType>>,
    latency: HashMap<MetricType, Duration>,
    failures: HashMap<MetricType, String>,
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProvider {
    /// Empty store that grants every request and supports every metric type
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: AuthorizationPolicy::Granted,
            supported: MetricType::ALL.to_vec(),
            samples: RwLock::new(Vec::new()),
            granted: RwLock::new(HashSet::new()),
            latency: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    /// Builds a provider from a fixture, anchoring relative sample times at `now`
    pub fn from_fixture(
        fixture: &ProviderFixture,
        now: DateTime<Utc>,
    ) -> crate::error::Result<Self> {
        let mut provider = Self::new()
            .with_policy(fixture.authorization.clone())
            .with_samples(fixture.resolve_samples(now)?);
        if let Some(supported) = &fixture.supported {
            provider = provider.with_supported(supported.clone());
        }
        for (metric, millis) in &fixture.latency_ms {
            provider = provider.with_latency(*metric, Duration::from_millis(*millis));
        }
        Ok(provider)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AuthorizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_supported(mut self, supported: Vec<MetricType>) -> Self {
        self.supported = supported;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: Vec<Sample>) -> Self {
        self.samples.get_mut().extend(samples);
        self
    }

    /// Delays every query for `metric` by `delay`
    #[must_use]
    pub fn with_latency(mut self, metric: MetricType, delay: Duration) -> Self {
        self.latency.insert(metric, delay);
        self
    }

    /// Makes every query for `metric` fail with `reason`
    #[must_use]
    pub fn with_failure(mut self, metric: MetricType, reason: impl Into<String>) -> Self {
        self.failures.insert(metric, reason.into());
        self
    }

    /// Adds a sample after construction
    pub async fn insert_sample(&self, sample: Sample) {
        self.samples.write().await.push(sample);
    }

    async fn check_query(&self, metric: MetricType) -> Result<(), ProviderError> {
        if !self.supported.contains(&metric) {
            return Err(ProviderError::UnsupportedType(metric));
        }
        if !self.granted.read().await.contains(&metric) {
            return Err(ProviderError::NotAuthorized(metric));
        }
        if let Some(delay) = self.latency.get(&metric) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(reason) = self.failures.get(&metric) {
            return Err(ProviderError::Unavailable(reason.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl HealthProvider for InMemoryProvider {
    fn supported_types(&self) -> Vec<MetricType> {
        self.supported.clone()
    }

    async fn request_authorization(
        &self,
        types: &[MetricType],
    ) -> Result<AuthorizationOutcome, ProviderError> {
        if let Some(unsupported) = types.iter().find(|t| !self.supported.contains(t)) {
            return Err(ProviderError::UnsupportedType(*unsupported));
        }
        match &self.policy {
            AuthorizationPolicy::Granted => {
                self.granted.write().await.extend(types.iter().copied());
                Ok(AuthorizationOutcome::Granted)
            }
            AuthorizationPolicy::Denied => Ok(AuthorizationOutcome::Denied),
            AuthorizationPolicy::Error(reason) => Err(ProviderError::Unavailable(reason.clone())),
        }
    }

    async fn aggregate(&self, query: AggregateQuery) -> Result<Option<f64>, ProviderError> {
        self.check_query(query.metric).await?;

        let samples = self.samples.read().await;
        let mut total: Option<f64> = None;
        for sample in samples
            .iter()
            .filter(|s| s.metric == query.metric && query.window.contains_start(s.start))
        {
            let Some(quantity) = sample.quantity else {
                continue;
            };
            let value = quantity
                .value_in(query.unit)
                .ok_or(ProviderError::IncompatibleUnit {
                    from: quantity.unit,
                    to: query.unit,
                })?;
            match query.aggregation {
                Aggregation::CumulativeSum => *total.get_or_insert(0.0) += value,
            }
        }
        Ok(total)
    }

    async fn samples(&self, query: SampleQuery) -> Result<Vec<Sample>, ProviderError> {
        self.check_query(query.metric).await?;

        let samples = self.samples.read().await;
        let mut matched: Vec<Sample> = samples
            .iter()
            .filter(|s| s.metric == query.metric && query.window.contains_start(s.start))
            .cloned()
            .collect();
        if let Some(SampleSort::EndDateDescending) = query.sort {
            matched.sort_by(|a, b| b.end.cmp(&a.end));
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}
