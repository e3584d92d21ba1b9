use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use predictron::metrics::Metrics;
use predictron::model::{Model, ModelArtifact};
use predictron::routes::create_router;
use predictron::state::AppState;

/// A tiny iris-shaped forest: 4 features, classes 0/1/2, three trees that
/// split on petal length and width.
pub const TEST_MODEL: &str = r#"{
    "n_features": 4,
    "classes": [0, 1, 2],
    "trees": [
        {"nodes": [
            {"feature": 2, "threshold": 2.45, "left": 1, "right": 2},
            {"class": 0},
            {"feature": 3, "threshold": 1.75, "left": 3, "right": 4},
            {"class": 1},
            {"class": 2}
        ]},
        {"nodes": [
            {"feature": 2, "threshold": 2.6, "left": 1, "right": 2},
            {"class": 0},
            {"feature": 3, "threshold": 1.6, "left": 3, "right": 4},
            {"class": 1},
            {"class": 2}
        ]},
        {"nodes": [
            {"feature": 3, "threshold": 0.8, "left": 1, "right": 2},
            {"class": 0},
            {"feature": 2, "threshold": 4.95, "left": 3, "right": 4},
            {"class": 1},
            {"class": 2}
        ]}
    ]
}"#;

/// Builds the full router in-process, bypassing the filesystem loader.
pub fn build_app() -> (Router, AppState) {
    let artifact: ModelArtifact =
        serde_json::from_str(TEST_MODEL).expect("test model should parse");
    let model = Arc::new(Model::from_artifact(artifact).expect("test model should validate"));

    let state = AppState {
        model,
        metrics: Metrics::new(),
    };

    (create_router(state.clone()), state)
}

pub fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
