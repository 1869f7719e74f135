use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Dependency-free: never spends upstream quota.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
