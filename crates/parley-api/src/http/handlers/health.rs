//! Health endpoints.
//!
//! - `GET /health`: liveness, no upstream access.
//! - `GET /health_upstream`: upstream configuration status plus a probe call
//!   when configured. Also mounted at `/health_groq`.

use axum::Json;
use axum::extract::State;

use crate::state::{AppState, UpstreamStatus};

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health_upstream
pub async fn health_upstream(State(state): State<AppState>) -> Json<UpstreamStatus> {
    Json(state.upstream_status().await)
}
