mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, router, test_config};
use gemini_proxy_service::services::providers::mock::MockTextProvider;
use gemini_proxy_service::startup::Application;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = router(Arc::new(MockTextProvider::replying("unused")));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gemini-proxy-service");
}

#[tokio::test]
async fn health_check_over_a_real_connection() {
    let app = Application::with_provider(
        test_config(100, 900),
        Arc::new(MockTextProvider::replying("unused")),
    )
    .await
    .expect("failed to build application");

    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = reqwest::Client::new()
        .get(format!("http://localhost:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("JSON body");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
