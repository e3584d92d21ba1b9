//! Prediction endpoint handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsRecorder;
use crate::model::Label;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

const ENDPOINT: &str = "/predict";

/// Registers the prediction route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}

#[derive(Serialize, Deserialize)]
struct PredictionRequest {
    /// One feature vector per input instance.
    inputs: Vec<Vec<f64>>,
}

#[derive(Serialize, Deserialize)]
struct PredictionResponse {
    /// One label per input vector, in input order.
    predictions: Vec<Label>,
}

/// Runs batch inference over the submitted feature vectors.
///
/// Takes the JSON extraction result rather than the extracted body so that
/// undecodable requests still reach the handler and are counted. The timer
/// guard is acquired first and records on every exit path.
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, HTTPError> {
    let _timer = state.metrics.request_timer(ENDPOINT);
    state.metrics.record_request(ENDPOINT);

    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected prediction request: {}", e);
        HTTPError::new(
            StatusCode::BAD_REQUEST,
            format!("malformed request body: {}", e),
        )
    })?;

    let inputs = to_matrix(&request.inputs, state.model.n_features())?;
    let predictions = state.model.predict(&inputs);

    Ok(Json(PredictionResponse { predictions }))
}

/// Packs the request vectors into the dense matrix the model expects.
///
/// Every vector must match the model's input dimensionality; a mismatch is
/// a client fault, rejected before any inference runs.
fn to_matrix(inputs: &[Vec<f64>], n_features: usize) -> Result<Array2<f64>, HTTPError> {
    for (i, vector) in inputs.iter().enumerate() {
        if vector.len() != n_features {
            return Err(HTTPError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "input {} has {} features, model expects {}",
                    i,
                    vector.len(),
                    n_features
                ),
            ));
        }
    }

    let mut matrix = Array2::zeros((inputs.len(), n_features));
    for (i, vector) in inputs.iter().enumerate() {
        for (j, value) in vector.iter().enumerate() {
            matrix[[i, j]] = *value;
        }
    }
    Ok(matrix)
}
