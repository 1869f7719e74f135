use axum::{
    Json,
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests: {message}")]
    TooManyRequests {
        message: String,
        retry_after: Option<u64>,
        limit: u32,
    },

    #[error("Upstream error {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        /// Client-visible error body. `code` mirrors the HTTP status and is
        /// only present for upstream/internal failures.
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            code: Option<u16>,
        }

        let (status, error, code, rate_limit) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None, None),
            AppError::TooManyRequests {
                message,
                retry_after,
                limit,
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                message,
                None,
                Some((retry_after, limit)),
            ),
            AppError::Upstream { status, message } => {
                (status, message, Some(status.as_u16()), None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                    None,
                )
            }
            AppError::Config(err) => {
                tracing::error!(error = %err, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                    Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                    None,
                )
            }
        };

        let mut res = (status, Json(ErrorBody { error, code })).into_response();

        if let Some((retry_after, limit)) = rate_limit {
            let headers = res.headers_mut();
            if let Some(retry) = retry_after {
                headers.insert(header::RETRY_AFTER, retry.into());
            }
            headers.insert(HeaderName::from_static("x-ratelimit-limit"), limit.into());
            headers.insert(HeaderName::from_static("x-ratelimit-remaining"), 0u32.into());
        }

        res
    }
}
