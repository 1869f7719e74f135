//! Request/response shapes for the generation endpoint.

use serde::{Deserialize, Serialize};

/// Inbound generation request. Field names match the browser client's JSON
/// (camelCase). Everything is optional at the serde layer; prompt presence
/// is enforced in the handler so the fixed 400 body can be produced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub is_json: bool,
    #[serde(default)]
    pub options: GenerateOptions,
}

/// Client overrides for the generation config. A supplied value wins even
/// when it is `0`; only an omitted field falls back to the server defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
}

/// Success body: the upstream text, relayed unmodified.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}
