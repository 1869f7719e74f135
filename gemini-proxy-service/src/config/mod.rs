use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Harm categories blocked at `BLOCK_MEDIUM_AND_ABOVE`; the exact set is a
/// deployment choice, overridable via `GEMINI_SAFETY_CATEGORIES`.
const DEFAULT_SAFETY_CATEGORIES: &str =
    "HARM_CATEGORY_HARASSMENT,HARM_CATEGORY_DANGEROUS_CONTENT";

const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECONDS: u64 = 900;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    /// Model used when the request does not name one.
    pub model: String,
    pub safety_categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl ProxyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        // An empty key counts as unset.
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Config(anyhow::anyhow!("GEMINI_API_KEY is required but not set"))
            })?;

        let safety_categories = env_or("GEMINI_SAFETY_CATEGORIES", DEFAULT_SAFETY_CATEGORIES)
            .split(',')
            .map(|category| category.trim().to_string())
            .filter(|category| !category.is_empty())
            .collect();

        Ok(ProxyConfig {
            common,
            gemini: GeminiSettings {
                api_key,
                model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
                safety_categories,
            },
            rate_limit: RateLimitSettings {
                max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", DEFAULT_RATE_LIMIT_MAX_REQUESTS)?,
                window_seconds: parse_env(
                    "RATE_LIMIT_WINDOW_SECONDS",
                    DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
                )?,
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e| {
            AppError::Config(anyhow::anyhow!("invalid value {:?} for {}: {}", raw, key, e))
        }),
        Err(_) => Ok(default),
    }
}
