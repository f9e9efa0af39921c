// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prelude module for convenient imports
//!
//! ```rust
//! use health_dashboard::prelude::*;
//! ```

// Core types
pub use crate::config::Config;
pub use crate::error::{AppError, Result};

// Provider
pub use crate::provider::{HealthProvider, InMemoryProvider, MetricType, ProviderError, TimeWindow};

// Snapshot and session
pub use crate::session::{AccessOutcome, DashboardSession};
pub use crate::snapshot::{HealthSnapshot, MetricStatus, SnapshotStore};

// Presentation
pub use crate::metrics::{AuthorizationLabels, MetricLabels, MetricsRegistry};
pub use crate::view::DashboardView;
