// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Authorization gate

use std::sync::Arc;

use crate::provider::{AuthorizationOutcome, HealthProvider, MetricType};
use crate::snapshot::AuthorizationStatus;

/// Result of asking the provider for read access
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Granted,
    Denied,
    Error(String),
}

impl AccessOutcome {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessOutcome::Granted)
    }

    /// Status published to the snapshot for this outcome
    #[must_use]
    pub fn status(&self) -> AuthorizationStatus {
        match self {
            AccessOutcome::Granted => AuthorizationStatus::Granted,
            AccessOutcome::Denied => AuthorizationStatus::Denied,
            AccessOutcome::Error(reason) => AuthorizationStatus::Failed(reason.clone()),
        }
    }

    /// Label value used for metrics
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessOutcome::Granted => "granted",
            AccessOutcome::Denied => "denied",
            AccessOutcome::Error(_) => "error",
        }
    }
}

/// Requests read permission before any fetch is attempted
#[derive(Clone)]
pub struct AuthorizationGate {
    provider: Arc<dyn HealthProvider>,
}

impl AuthorizationGate {
    #[must_use]
    pub fn new(provider: Arc<dyn HealthProvider>) -> Self {
        Self { provider }
    }

    /// Asks the provider for read access to `types`
    pub async fn request_access(&self, types: &[MetricType]) -> AccessOutcome {
        tracing::debug!("Requesting read access for {} metric type(s)", types.len());
        match self.provider.request_authorization(types).await {
            Ok(AuthorizationOutcome::Granted) => {
                tracing::info!("Health data access granted");
                AccessOutcome::Granted
            }
            Ok(AuthorizationOutcome::Denied) => {
                tracing::warn!("Health data access denied");
                AccessOutcome::Denied
            }
            Err(e) => {
                tracing::warn!("Authorization error: {}", e);
                AccessOutcome::Error(e.to_string())
            }
        }
    }
}
