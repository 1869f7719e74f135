mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, router_with_config, test_config};
use gemini_proxy_service::services::providers::mock::MockTextProvider;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

fn request_from(ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/gemini")
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(r#"{"prompt": "hi"}"#))
        .unwrap()
}

#[tokio::test]
async fn requests_past_the_quota_are_rejected() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let app = router_with_config(provider.clone(), test_config(2, 60));

    for _ in 0..2 {
        let response = app.clone().oneshot(request_from("10.1.1.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(request_from("10.1.1.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    assert_eq!(response.headers()["x-ratelimit-limit"], "2");
    assert_eq!(
        body_json(response).await,
        json!({"error": "Too many requests, please try again later."})
    );

    // The rejected request never reached the handler.
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn quota_is_tracked_per_source_ip() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let app = router_with_config(provider, test_config(1, 60));

    let first = app.clone().oneshot(request_from("10.2.2.1")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let other_ip = app.clone().oneshot(request_from("10.2.2.2")).await.unwrap();
    assert_eq!(other_ip.status(), StatusCode::OK);

    let over_quota = app.clone().oneshot(request_from("10.2.2.1")).await.unwrap();
    assert_eq!(over_quota.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn requests_without_a_resolvable_ip_are_allowed() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let app = router_with_config(provider, test_config(1, 60));

    // No x-forwarded-for and no ConnectInfo under oneshot.
    for _ in 0..3 {
        let request = Request::builder()
            .method("POST")
            .uri("/api/gemini")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"prompt": "hi"}"#))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn rate_limit_applies_over_real_connections() {
    let provider = Arc::new(MockTextProvider::replying("ok"));
    let app = gemini_proxy_service::startup::Application::with_provider(
        test_config(2, 60),
        provider,
    )
    .await
    .expect("failed to build application");

    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let url = format!("http://localhost:{}/api/gemini", port);

    for _ in 0..2 {
        let response = client
            .post(&url)
            .json(&json!({"prompt": "hi"}))
            .send()
            .await
            .expect("request failed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    let response = client
        .post(&url)
        .json(&json!({"prompt": "hi"}))
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), reqwest::StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json().await.expect("JSON body");
    assert_eq!(
        body,
        json!({"error": "Too many requests, please try again later."})
    );
}
