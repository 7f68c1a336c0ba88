//! Environment-driven configuration for the recommendation engine.
//!
//! Provider selection and credentials come from the environment and are
//! validated once at startup. A missing API key for the selected provider is
//! a fatal `Configuration` error; nothing here is re-checked per request.
//!
//! Recognized variables:
//! - `ADVISOR_LLM_PROVIDER`: `openai` (default), `anthropic`, or `stub`
//! - `ADVISOR_LLM_MODEL`: overrides the per-provider default model
//! - `ADVISOR_LLM_BASE_URL`: overrides the provider endpoint
//! - `ADVISOR_LLM_TIMEOUT_SECS`: bounded wait for a single completion
//! - `ADVISOR_LLM_MAX_TOKENS`: completion token cap
//! - `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`: backend credentials

use crate::error::EngineError;
use crate::llm_provider::{LlmProviderConfig, LlmProviderType};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Engine-level configuration. Built once and injected into the engine;
/// there is no ambient global client state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub llm: LlmProviderConfig,
}

impl EngineConfig {
    /// Build configuration from the environment, failing fast when the
    /// selected provider has no usable credentials.
    pub fn from_env() -> Result<Self, EngineError> {
        let provider = std::env::var("ADVISOR_LLM_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .to_lowercase();

        let provider_type = match provider.as_str() {
            "openai" => LlmProviderType::OpenAI,
            "anthropic" => LlmProviderType::Anthropic,
            "stub" => LlmProviderType::Stub,
            other => {
                return Err(EngineError::Configuration(format!(
                    "Unknown LLM provider '{}' (expected openai, anthropic, or stub)",
                    other
                )))
            }
        };

        let api_key = match provider_type {
            LlmProviderType::OpenAI => Some(require_env("OPENAI_API_KEY")?),
            LlmProviderType::Anthropic => Some(require_env("ANTHROPIC_API_KEY")?),
            LlmProviderType::Stub => None,
        };

        let default_model = match provider_type {
            LlmProviderType::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            _ => DEFAULT_OPENAI_MODEL,
        };

        let timeout_seconds = std::env::var("ADVISOR_LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_tokens = std::env::var("ADVISOR_LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        Ok(Self {
            llm: LlmProviderConfig {
                provider_type,
                model: std::env::var("ADVISOR_LLM_MODEL")
                    .unwrap_or_else(|_| default_model.to_string()),
                api_key,
                base_url: std::env::var("ADVISOR_LLM_BASE_URL").ok(),
                max_tokens: Some(max_tokens),
                temperature: Some(0.7),
                timeout_seconds: Some(timeout_seconds),
            },
        })
    }

    /// Configuration backed by the deterministic stub provider.
    pub fn stub() -> Self {
        Self {
            llm: LlmProviderConfig {
                provider_type: LlmProviderType::Stub,
                model: "stub-model".to_string(),
                api_key: None,
                base_url: None,
                max_tokens: None,
                temperature: None,
                timeout_seconds: None,
            },
        }
    }
}

fn require_env(name: &str) -> Result<String, EngineError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EngineError::Configuration(format!(
            "{} is not set; the reasoning backend cannot be reached",
            name
        ))),
    }
}
