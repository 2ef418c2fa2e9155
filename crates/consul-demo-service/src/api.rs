//! Application endpoints: greeting and manual refresh.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::app_state::AppState;
use crate::refresh::{refresh_config, Trigger};

/// `[<region>-<instance>] <message>`
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!("[{}] {}\n", state.service_id(), state.message().await);
    state.metrics().requests_root.inc();
    tracing::info!("[http] /");
    (StatusCode::OK, body)
}

pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    refresh_config(&state, Trigger::Http).await;
    state.metrics().requests_refresh.inc();
    tracing::info!("[http] /refresh");
    (StatusCode::OK, "OK\n")
}
