// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Prometheus metrics for the health dashboard
//!
//! Exposes the current snapshot values alongside fetch and authorization outcomes.

mod labels;
mod registry;

/// Labels for metric types and authorization outcomes
pub use labels::{AuthorizationLabels, MetricLabels};

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
