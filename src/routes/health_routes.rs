//! Health check endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Simple health check endpoint.
///
/// Returns a 200 OK status whenever the process is able to respond. Does
/// not check the model: liveness, not readiness.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
