use gemini_proxy_service::config::ProxyConfig;
use gemini_proxy_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("gemini-proxy-service", "info");

    // Configuration failures (a missing GEMINI_API_KEY above all) abort the
    // process before any port is bound.
    let config = ProxyConfig::load().map_err(|e| {
        tracing::error!("failed to load configuration: {}", e);
        std::io::Error::other(format!("configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("failed to start application: {}", e);
        std::io::Error::other(format!("startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
