//! Upstream text-generation provider abstraction.
//!
//! Failure classification happens here, at the provider boundary: handlers
//! only ever see the typed `ProviderError` variants, never raw upstream
//! payloads.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use axum::http::StatusCode;
use service_core::error::AppError;
use thiserror::Error;

/// Sanitized message for credential failures; the raw upstream text is
/// logged server-side only.
pub const INVALID_KEY_MESSAGE: &str = "API Key is invalid or not authorized.";

const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error type for provider operations. `detail` fields carry the raw
/// upstream payload for logging and never reach the client.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("upstream rejected the API key (status {status}): {detail}")]
    Unauthorized { status: u16, detail: String },

    #[error("upstream rate limit exceeded: {detail}")]
    RateLimited { message: String, detail: String },

    #[error("upstream API error {status}: {detail}")]
    Api {
        status: u16,
        message: String,
        detail: String,
    },

    #[error("generation blocked by upstream safety filters: {0}")]
    Blocked(String),

    #[error("network error calling upstream: {0}")]
    Network(String),

    #[error("could not decode upstream response: {0}")]
    InvalidResponse(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unauthorized { status, .. } => AppError::Upstream {
                status: StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message: INVALID_KEY_MESSAGE.to_string(),
            },
            ProviderError::RateLimited { message, .. } => AppError::Upstream {
                status: StatusCode::TOO_MANY_REQUESTS,
                message,
            },
            ProviderError::Api {
                status, message, ..
            } => AppError::Upstream {
                status: StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            },
            ProviderError::Blocked(reason) => AppError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Generation blocked by upstream safety filters: {reason}"),
            },
            // Transport and decode failures may embed the keyed request URL;
            // the client only ever sees the generic message.
            ProviderError::Network(_) | ProviderError::InvalidResponse(_) => AppError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: GENERIC_ERROR_MESSAGE.to_string(),
            },
        }
    }
}

/// Effective generation parameters after merging client overrides with
/// server defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: i32,
    pub response_mime_type: String,
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Runs one single-turn generation and returns the raw model text.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}
