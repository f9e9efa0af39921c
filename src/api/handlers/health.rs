use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::snapshot::AuthorizationStatus;

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub authorization: String,
}

/// GET /health
///
/// Always answers 200 while the service runs. Status is "degraded" when health
/// data access was denied or failed.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let authorization = state.snapshot.borrow().authorization.clone();
    let (status, authorization) = match authorization {
        AuthorizationStatus::Pending => ("ok", "pending"),
        AuthorizationStatus::Granted => ("ok", "granted"),
        AuthorizationStatus::Denied => ("degraded", "denied"),
        AuthorizationStatus::Failed(_) => ("degraded", "failed"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        authorization: authorization.to_string(),
    };

    (StatusCode::OK, Json(response))
}
