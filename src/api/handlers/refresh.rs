// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

use crate::api::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub status: String,
}

fn respond(code: StatusCode, status: &str) -> Response {
    (
        code,
        Json(RefreshResponse {
            status: status.to_string(),
        }),
    )
        .into_response()
}

/// POST /refresh
///
/// Queues a refresh cycle. Requests made while one is already queued are coalesced.
pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.refresh_tx.try_send(()) {
        Ok(()) => {
            tracing::debug!("Refresh queued");
            respond(StatusCode::ACCEPTED, "queued")
        }
        Err(TrySendError::Full(())) => respond(StatusCode::ACCEPTED, "already_queued"),
        Err(TrySendError::Closed(())) => {
            tracing::warn!("Refresh requested after the dashboard session stopped");
            respond(StatusCode::SERVICE_UNAVAILABLE, "session_stopped")
        }
    }
}
