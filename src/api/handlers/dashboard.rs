// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::AppState;

/// GET /
///
/// Renders the dashboard from the latest published snapshot.
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Response {
    let text = state.view().render(&state.snapshot.borrow());
    (
        StatusCode::OK,
        [("Content-Type", "text/plain; charset=utf-8")],
        text,
    )
        .into_response()
}

/// GET /snapshot
pub async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.snapshot.borrow().clone();
    (StatusCode::OK, Json(snapshot)).into_response()
}
