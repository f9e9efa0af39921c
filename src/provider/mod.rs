// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Health-data provider boundary
//!
//! The dashboard treats the health store as an opaque collaborator behind the
//! [`HealthProvider`] trait. [`InMemoryProvider`] backs the binary (loaded from a
//! JSON fixture) and the tests.

mod fixture;
mod memory;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use fixture::{AuthorizationPolicy, ProviderFixture};
pub use memory::InMemoryProvider;
pub use types::{
    AggregateQuery, Aggregation, AuthorizationOutcome, HealthUnit, MetricType, Quantity, Sample,
    SampleQuery, SampleSort, TimeWindow,
};

/// Errors reported by a health-data provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider cannot serve the metric type at all
    #[error("metric type {0} is not supported by the provider")]
    UnsupportedType(MetricType),

    /// Read access for the metric type has not been granted
    #[error("read access to {0} has not been granted")]
    NotAuthorized(MetricType),

    /// A stored quantity cannot be expressed in the requested unit
    #[error("cannot convert {from} to {to}")]
    IncompatibleUnit { from: HealthUnit, to: HealthUnit },

    /// Any other failure inside the provider
    #[error("{0}")]
    Unavailable(String),
}

/// Read-only access to a health-data store
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Metric types this provider can serve
    fn supported_types(&self) -> Vec<MetricType>;

    /// Requests read permission for `types`. May prompt the end user.
    async fn request_authorization(
        &self,
        types: &[MetricType],
    ) -> Result<AuthorizationOutcome, ProviderError>;

    /// Aggregates samples over the query window.
    ///
    /// Returns `Ok(None)` when no sample matches the window.
    async fn aggregate(&self, query: AggregateQuery) -> Result<Option<f64>, ProviderError>;

    /// Returns individual samples inside the query window
    async fn samples(&self, query: SampleQuery) -> Result<Vec<Sample>, ProviderError>;
}
