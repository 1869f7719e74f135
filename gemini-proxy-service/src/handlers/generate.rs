//! The generation endpoint: validate, merge defaults, call upstream once,
//! relay the text or a normalized error.

use crate::models::{GenerateRequest, GenerateResponse};
use crate::services::providers::GenerationParams;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

const MISSING_PROMPT_MESSAGE: &str = "Missing prompt in request body.";

const DEFAULT_TEXT_TEMPERATURE: f32 = 0.7;
const DEFAULT_JSON_TEMPERATURE: f32 = 0.2;
const DEFAULT_MAX_OUTPUT_TOKENS: i32 = 2048;

pub async fn generate(
    State(state): State<AppState>,
    payload: Option<Json<GenerateRequest>>,
) -> Result<Json<GenerateResponse>, AppError> {
    // A body that fails to parse is treated like an empty one, so every
    // outcome stays a JSON body.
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    let prompt = match request.prompt.as_deref() {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Err(AppError::BadRequest(MISSING_PROMPT_MESSAGE.to_string())),
    };

    let params = resolve_params(&request, &state.config.gemini.model);

    tracing::debug!(
        model = %params.model,
        is_json = request.is_json,
        prompt_len = prompt.len(),
        "forwarding generation request"
    );

    let text = state
        .text_provider
        .generate(&prompt, &params)
        .await
        .map_err(|err| {
            // Raw upstream detail stays server-side; the mapping below
            // sanitizes what the client sees.
            tracing::error!(error = %err, "upstream generation failed");
            AppError::from(err)
        })?;

    Ok(Json(GenerateResponse { text }))
}

/// Merges client overrides with server defaults. A value the client supplied
/// always wins, including an explicit `0`; only omitted fields fall back.
fn resolve_params(request: &GenerateRequest, default_model: &str) -> GenerationParams {
    let temperature = request.options.temperature.unwrap_or(if request.is_json {
        DEFAULT_JSON_TEMPERATURE
    } else {
        DEFAULT_TEXT_TEMPERATURE
    });

    let response_mime_type = if request.is_json {
        "application/json"
    } else {
        "text/plain"
    };

    GenerationParams {
        model: request
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        temperature,
        max_output_tokens: request
            .options
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        response_mime_type: response_mime_type.to_string(),
    }
}
