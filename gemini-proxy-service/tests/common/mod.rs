#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use gemini_proxy_service::config::{GeminiSettings, ProxyConfig, RateLimitSettings};
use gemini_proxy_service::services::providers::TextProvider;
use gemini_proxy_service::startup::{build_router, AppState};
use http_body_util::BodyExt;
use service_core::config::Config;
use std::sync::Arc;

pub fn test_config(max_requests: u32, window_seconds: u64) -> ProxyConfig {
    ProxyConfig {
        common: Config { port: 0 },
        gemini: GeminiSettings {
            api_key: "test-api-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            safety_categories: vec![
                "HARM_CATEGORY_HARASSMENT".to_string(),
                "HARM_CATEGORY_DANGEROUS_CONTENT".to_string(),
            ],
        },
        rate_limit: RateLimitSettings {
            max_requests,
            window_seconds,
        },
    }
}

pub fn router(provider: Arc<dyn TextProvider>) -> Router {
    router_with_config(provider, test_config(100, 900))
}

pub fn router_with_config(provider: Arc<dyn TextProvider>, config: ProxyConfig) -> Router {
    build_router(AppState {
        config,
        text_provider: provider,
    })
}

pub fn gemini_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/gemini")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}
