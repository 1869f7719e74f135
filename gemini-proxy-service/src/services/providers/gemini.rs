//! Gemini provider implementation.
//!
//! One non-streaming `generateContent` call per request against Google's
//! generative-language REST API.

use super::{GenerationParams, ProviderError, TextProvider};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Server-side safety policy; not client-configurable.
const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// Long-lived Gemini client. Constructed once at startup and shared across
/// requests through `AppState`.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    safety_settings: Vec<SafetySetting>,
    client: Client,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("failed to create HTTP client");

        let safety_settings = settings
            .safety_categories
            .iter()
            .map(|category| SafetySetting {
                category: category.clone(),
                threshold: BLOCK_THRESHOLD.to_string(),
            })
            .collect();

        Self {
            api_key: settings.api_key.clone(),
            base_url: GEMINI_API_BASE.to_string(),
            safety_settings,
            client,
        }
    }

    /// Points the client at a different API base; used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
                response_mime_type: params.response_mime_type.clone(),
            },
            safety_settings: self.safety_settings.clone(),
        };

        tracing::debug!(
            model = %params.model,
            prompt_len = prompt.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url(&params.model))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), body));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(reason) = api_response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Err(ProviderError::Blocked(reason));
        }

        let candidate = api_response.candidates.first().ok_or_else(|| {
            ProviderError::InvalidResponse("response carried no candidates".to_string())
        })?;

        let text = candidate
            .content
            .as_ref()
            .and_then(|content| content.parts.iter().find_map(|part| part.text.clone()));

        match text {
            Some(text) => Ok(text),
            None => match candidate.finish_reason.as_deref() {
                Some("SAFETY") => Err(ProviderError::Blocked("SAFETY".to_string())),
                _ => Err(ProviderError::InvalidResponse(
                    "candidate carried no text part".to_string(),
                )),
            },
        }
    }
}

/// Decides the typed error variant for a non-2xx upstream response.
fn classify_failure(status: u16, body: String) -> ProviderError {
    let message = serde_json::from_str::<GeminiErrorResponse>(&body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty());

    let invalid_key = matches!(status, 401 | 403)
        || (status == 400
            && (body.contains("API_KEY_INVALID") || body.contains("API key not valid")));

    if invalid_key {
        return ProviderError::Unauthorized {
            status,
            detail: body,
        };
    }

    let message = message.unwrap_or_else(|| "Internal Server Error".to_string());

    if status == 429 {
        return ProviderError::RateLimited {
            message,
            detail: body,
        };
    }

    ProviderError::Api {
        status,
        message,
        detail: body,
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: i32,
    response_mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}
