// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! # Health Dashboard
//!
//! Single-screen personal health dashboard.
//!
//! This library reads step count, latest heart rate, dietary energy and recent
//! sleep intervals from a health-data provider and renders them as a dashboard
//! in the terminal and over HTTP.
//!
//! ## Main modules
//! - `api`: HTTP surface
//! - `config`: configuration management
//! - `error`: error types
//! - `fetcher`: per-metric provider queries
//! - `metrics`: Prometheus registry
//! - `provider`: health-data provider trait and in-memory store
//! - `session`: authorization gate and refresh cycles
//! - `snapshot`: snapshot state and its single-writer store
//! - `view`: dashboard rendering
//! - `prelude`: commonly used types and traits

mod api;
mod config;
mod error;
mod fetcher;
mod metrics;
mod provider;
mod session;
mod snapshot;
mod view;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, parse_utc_offset};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP router and state
pub use api::{AppState, create_router};

/// Health-data provider boundary
pub use provider::{
    AggregateQuery, Aggregation, AuthorizationOutcome, AuthorizationPolicy, HealthProvider,
    HealthUnit, InMemoryProvider, MetricType, ProviderError, ProviderFixture, Quantity, Sample,
    SampleQuery, SampleSort, TimeWindow,
};

/// Metric fetching
pub use fetcher::{FetchError, MetricFetcher, window_for};

/// Snapshot state and store
pub use snapshot::{
    AuthorizationStatus, FetchedValue, HealthSnapshot, MetricState, MetricStatus, SleepInterval,
    SnapshotStore, SnapshotUpdate, SnapshotUpdater,
};

/// Authorization gate and refresh cycles
pub use session::{
    AccessOutcome, AuthorizationGate, DashboardSession, start_session_loop, verify_supported_types,
};

/// Dashboard rendering
pub use view::{DashboardView, NO_SLEEP_DATA, spawn_renderer};

/// Metrics registry
pub use metrics::MetricsRegistry;
