//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! prediction, metrics exposition, and health checks.

mod health_routes;
mod metrics;
mod predict;

use axum::Router;

use crate::state::AppState;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(predict::routes())
        .merge(metrics::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
