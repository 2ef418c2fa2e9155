//! Operational HTTP endpoints.
//!
//! - `/livez`   : liveness, always `OK`
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::metrics::CONTENT_TYPE;

pub async fn livez(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics().requests_livez.inc();
    tracing::info!("[http] /livez");
    (StatusCode::OK, "OK\n")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
