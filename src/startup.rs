//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including loading the model artifact, building the metrics registry,
//! and route setup.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::metrics::Metrics;
use crate::model::load_model;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// Loads the model artifact from the configured path, builds the shared
/// state, and starts serving requests on the configured bind address.
///
/// # Errors
///
/// Returns an error if the model artifact is missing or invalid. This
/// happens before the listening port is bound, so a misconfigured process
/// never accepts traffic.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let model = Arc::new(load_model(&config.model_path)?);

    info!(
        n_features = model.n_features(),
        classes = model.classes().len(),
        trees = model.n_trees(),
        "Model loaded from {}",
        config.model_path.display()
    );

    let state = AppState {
        model,
        metrics: Metrics::new(),
    };

    let app = routes::create_router(state);

    info!("Starting server on {}", config.bind_address);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("Could not bind to specified address");

    axum::serve(listener, app).await.unwrap();

    Ok(())
}
