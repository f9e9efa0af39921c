// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Registry encoding for scrapes

use prometheus_client::encoding::text::encode;

use crate::error::{AppError, Result};

use super::MetricsRegistry;

impl MetricsRegistry {
    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry).map_err(|e| AppError::Metrics(e.to_string()))?;
        Ok(buffer)
    }
}
