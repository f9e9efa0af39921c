// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

mod dashboard;
mod health;
mod metrics;
mod refresh;

pub use dashboard::{dashboard_handler, snapshot_handler};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use refresh::refresh_handler;
