//! Axum router wiring.
//!
//! Routes answer every method, like the plain handler functions of a Go mux.

use axum::{routing::any, Router};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(api::root))
        .route("/refresh", any(api::refresh))
        .route("/livez", any(ops::livez))
        .route("/metrics", any(ops::metrics))
        // any other path greets, like `/`
        .fallback(api::root)
        .with_state(state)
}
