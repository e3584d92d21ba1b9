mod common;

use axum::body::to_bytes;
use axum::http::StatusCode;
use tower::ServiceExt;

use common::{build_app, get, post_json};

/// Pulls the value of `request_count{endpoint="/predict"}` out of the
/// Prometheus text exposition, defaulting to zero when absent.
fn predict_count(exposition: &str) -> f64 {
    let needle = r#"request_count{endpoint="/predict"} "#;
    exposition
        .lines()
        .find_map(|line| line.strip_prefix(needle))
        .map(|value| value.parse().expect("counter value should parse"))
        .unwrap_or(0.0)
}

async fn scrape(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(get("/metrics"))
        .await
        .expect("scrape should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("exposition should be UTF-8")
}

#[tokio::test]
async fn scrape_uses_the_versioned_text_content_type() {
    let (app, _state) = build_app();

    let response = app
        .oneshot(get("/metrics"))
        .await
        .expect("scrape should complete");

    let content_type = response
        .headers()
        .get("Content-Type")
        .expect("Content-Type header missing")
        .to_str()
        .expect("Content-Type should be valid UTF-8");
    assert_eq!(content_type, "text/plain; version=0.0.4; charset=utf-8");
}

#[tokio::test]
async fn predict_counter_increments_once_per_call() {
    let (app, _state) = build_app();

    assert_eq!(predict_count(&scrape(&app).await), 0.0);

    // Successful call.
    let response = app
        .clone()
        .oneshot(post_json("/predict", r#"{"inputs": [[5.1, 3.5, 1.4, 0.2]]}"#))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(predict_count(&scrape(&app).await), 1.0);

    // Malformed body still counts.
    let response = app
        .clone()
        .oneshot(post_json("/predict", "garbage"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(predict_count(&scrape(&app).await), 2.0);

    // Shape mismatch still counts.
    let response = app
        .clone()
        .oneshot(post_json("/predict", r#"{"inputs": [[1.0, 2.0]]}"#))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(predict_count(&scrape(&app).await), 3.0);
}

#[tokio::test]
async fn latency_summary_appears_after_predict_calls() {
    let (app, _state) = build_app();

    let exposition = scrape(&app).await;
    assert!(!exposition.contains("request_latency_seconds"));

    let response = app
        .clone()
        .oneshot(post_json("/predict", r#"{"inputs": [[5.1, 3.5, 1.4, 0.2]]}"#))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let exposition = scrape(&app).await;
    assert!(exposition.contains(r#"request_latency_seconds_count{endpoint="/predict"} 1"#));
    assert!(exposition.contains(r#"request_latency_seconds_sum{endpoint="/predict"}"#));
}

#[tokio::test]
async fn scrape_itself_is_not_instrumented() {
    let (app, _state) = build_app();

    scrape(&app).await;
    let exposition = scrape(&app).await;
    assert!(!exposition.contains(r#"endpoint="/metrics""#));
}
