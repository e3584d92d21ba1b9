//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! the loaded model and the metrics registry. Configuration is consumed
//! entirely during startup and does not travel with requests.

use std::sync::Arc;

use crate::metrics::Metrics;
use crate::model::Model;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler. The model is loaded once
/// at startup and never mutated afterwards, so it needs no locking.
#[derive(Clone)]
pub struct AppState {
    /// The classification model, immutable after load.
    pub model: Arc<Model>,
    /// Process-wide metrics registry.
    pub metrics: Metrics,
}
