//! LLM Provider Abstraction
//!
//! This module provides the abstraction layer for the reasoning backend,
//! allowing the recommendation engine to work with different generative-text
//! services while maintaining a consistent interface: one prompt in, one raw
//! text completion out, no retry.
//!
//! Credentials are validated at construction time so a misconfigured service
//! fails at startup rather than mid-request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Instant;
use tracing::debug;

use crate::error::EngineError;

/// Captures summary details about a single LLM completion.
struct LlmCompletion {
    content: String,
    prompt_hash: String,
    response_hash: String,
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
    latency_ms: u128,
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn log_completion(provider: &str, model: &str, completion: &LlmCompletion) {
    debug!(
        provider,
        model,
        prompt_hash = %completion.prompt_hash,
        response_hash = %completion.response_hash,
        prompt_tokens = ?completion.prompt_tokens,
        completion_tokens = ?completion.completion_tokens,
        total_tokens = ?completion.total_tokens,
        latency_ms = completion.latency_ms as u64,
        "llm completion"
    );
}

/// Configuration for LLM providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    pub provider_type: LlmProviderType,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub timeout_seconds: Option<u64>,
}

/// Supported LLM provider types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LlmProviderType {
    Stub,      // For testing and offline demos - deterministic responses
    OpenAI,    // OpenAI GPT models (and OpenAI-compatible endpoints)
    Anthropic, // Anthropic Claude models
}

/// Abstract interface for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// One network round trip to the backend: prompt in, raw text out.
    /// No retry; a bounded wait is enforced by the underlying HTTP client.
    async fn complete(&self, prompt: &str) -> Result<String, EngineError>;

    /// Get provider information.
    fn get_info(&self) -> LlmProviderInfo;
}

/// Information about an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmProviderInfo {
    pub name: String,
    pub version: String,
    pub model: String,
    pub capabilities: Vec<String>,
}

/// OpenAI-compatible provider (works with OpenAI and compatible gateways).
pub struct OpenAILlmProvider {
    config: LlmProviderConfig,
    client: reqwest::Client,
}

impl OpenAILlmProvider {
    pub fn new(config: LlmProviderConfig) -> Result<Self, EngineError> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(EngineError::Configuration(
                "API key required for OpenAI provider".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.timeout_seconds.unwrap_or(30),
            ))
            .build()
            .map_err(|e| {
                EngineError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    async fn make_request(&self, messages: Vec<OpenAIMessage>) -> Result<LlmCompletion, EngineError> {
        // Key presence is checked in `new`; absence here is a programming error
        // and still maps to a configuration failure.
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            EngineError::Configuration("API key required for OpenAI provider".to_string())
        })?;

        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1");
        let url = format!("{}/chat/completions", base_url);

        let request_body = OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let payload_bytes = serde_json::to_vec(&request_body).map_err(|e| {
            EngineError::Reasoning(format!("Failed to serialize request body: {}", e))
        })?;
        let prompt_hash = sha256_hex(&payload_bytes);

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .body(payload_bytes)
            .send()
            .await
            .map_err(|e| EngineError::Reasoning(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| EngineError::Reasoning(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(EngineError::Reasoning(format!(
                "API request failed (HTTP {}): {}",
                status.as_u16(),
                preview(&raw_body, 500)
            )));
        }

        let response_hash = sha256_hex(raw_body.as_bytes());

        let response_body: OpenAIResponse = serde_json::from_str(&raw_body).map_err(|e| {
            EngineError::Reasoning(format!(
                "Failed to parse API response as JSON: {} (body: {})",
                e,
                preview(&raw_body, 500)
            ))
        })?;

        let choice = response_body
            .choices
            .first()
            .ok_or_else(|| EngineError::Reasoning("LLM response missing choices".to_string()))?;

        let usage = response_body.usage.unwrap_or_default();

        Ok(LlmCompletion {
            content: choice.message.content.clone(),
            prompt_hash,
            response_hash,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            latency_ms: start.elapsed().as_millis(),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAILlmProvider {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let messages = vec![OpenAIMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        let completion = self.make_request(messages).await?;
        log_completion("openai", &self.config.model, &completion);
        Ok(completion.content)
    }

    fn get_info(&self) -> LlmProviderInfo {
        LlmProviderInfo {
            name: "OpenAI".to_string(),
            version: "1.0".to_string(),
            model: self.config.model.clone(),
            capabilities: vec![
                "recommendation_generation".to_string(),
                "option_synthesis".to_string(),
            ],
        }
    }
}

// OpenAI API types
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Default, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Anthropic Claude provider.
pub struct AnthropicLlmProvider {
    config: LlmProviderConfig,
    client: reqwest::Client,
}

impl AnthropicLlmProvider {
    pub fn new(config: LlmProviderConfig) -> Result<Self, EngineError> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(EngineError::Configuration(
                "API key required for Anthropic provider".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.timeout_seconds.unwrap_or(30),
            ))
            .build()
            .map_err(|e| {
                EngineError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    async fn make_request(
        &self,
        messages: Vec<AnthropicMessage>,
    ) -> Result<LlmCompletion, EngineError> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            EngineError::Configuration("API key required for Anthropic provider".to_string())
        })?;

        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.anthropic.com/v1");
        let url = format!("{}/messages", base_url);

        let request_body = AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens.unwrap_or(4096),
            temperature: self.config.temperature,
        };
        let payload_bytes = serde_json::to_vec(&request_body).map_err(|e| {
            EngineError::Reasoning(format!("Failed to serialize request body: {}", e))
        })?;
        let prompt_hash = sha256_hex(&payload_bytes);

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .body(payload_bytes)
            .send()
            .await
            .map_err(|e| EngineError::Reasoning(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| EngineError::Reasoning(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(EngineError::Reasoning(format!(
                "API request failed (HTTP {}): {}",
                status.as_u16(),
                preview(&raw_body, 500)
            )));
        }

        let response_hash = sha256_hex(raw_body.as_bytes());

        let response_body: AnthropicResponse = serde_json::from_str(&raw_body).map_err(|e| {
            EngineError::Reasoning(format!("Failed to parse API response: {}", e))
        })?;

        let content = response_body
            .content
            .first()
            .map(|item| item.text.clone())
            .ok_or_else(|| EngineError::Reasoning("LLM response missing content".to_string()))?;

        let usage = response_body.usage.unwrap_or_default();
        let total_tokens = match (usage.input_tokens, usage.output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        };

        Ok(LlmCompletion {
            content,
            prompt_hash,
            response_hash,
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens,
            latency_ms: start.elapsed().as_millis(),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicLlmProvider {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let messages = vec![AnthropicMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        let completion = self.make_request(messages).await?;
        log_completion("anthropic", &self.config.model, &completion);
        Ok(completion.content)
    }

    fn get_info(&self) -> LlmProviderInfo {
        LlmProviderInfo {
            name: "Anthropic Claude".to_string(),
            version: "1.0".to_string(),
            model: self.config.model.clone(),
            capabilities: vec![
                "recommendation_generation".to_string(),
                "option_synthesis".to_string(),
            ],
        }
    }
}

// Anthropic API types
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    text: String,
}

#[derive(Default, Deserialize)]
struct AnthropicUsage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

/// Deterministic provider for tests and offline demos.
///
/// Responses are wrapped in Markdown fences and surrounded by prose on
/// purpose, so the extraction path is exercised exactly as it would be with
/// a real model.
pub struct StubLlmProvider {
    config: LlmProviderConfig,
}

impl StubLlmProvider {
    pub fn new(config: LlmProviderConfig) -> Self {
        Self { config }
    }

    fn stub_recommendations(&self) -> String {
        r#"Sure! Here are my recommendations based on the profile:

```json
{
  "recommendations": [
    {
      "optionId": 1,
      "matchScore": 92,
      "reasoning": "Strong overlap between the stated interests and this field.",
      "keyAlignments": ["interest alignment", "skill overlap"],
      "suggestedPath": "Start with foundational coursework, then build a portfolio.",
      "potentialChallenges": ["Competitive entry-level market"],
      "nextSteps": ["Take an introductory course", "Join a student project"]
    },
    {
      "optionId": 2,
      "matchScore": 84,
      "reasoning": "Good secondary fit given the career goals.",
      "keyAlignments": ["goal alignment"],
      "suggestedPath": "Shadow a practitioner and evaluate fit.",
      "potentialChallenges": ["Requires certification"],
      "nextSteps": ["Research certification paths"]
    },
    {
      "optionId": 3,
      "matchScore": 76,
      "reasoning": "Partial match worth exploring.",
      "keyAlignments": ["transferable skills"],
      "suggestedPath": "Explore through electives.",
      "potentialChallenges": ["Less direct interest overlap"],
      "nextSteps": ["Attend an industry talk"]
    }
  ],
  "profileSummary": "A motivated student with a clear technical orientation.",
  "overallInsights": ["The profile favors analytical fields."],
  "careerPathSuggestions": ["Consider internships early."]
}
```

Let me know if you would like alternatives."#
            .to_string()
    }

    fn stub_new_options(&self) -> String {
        r#"Here are new option definitions covering the requested areas:

```json
{
  "newOptions": [
    {
      "name": "Emerging Interdisciplinary Role",
      "category": "Emerging Fields",
      "description": "A role synthesized to cover an interest not present in the catalog.",
      "salaryRange": "$60k-$110k",
      "outlook": "Positive",
      "growthRate": "15%",
      "skills": ["Adaptability", "Domain research"],
      "careerPaths": ["Specialist", "Consultant"]
    }
  ]
}
```"#
            .to_string()
    }
}

#[async_trait]
impl LlmProvider for StubLlmProvider {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        // The synthesis prompt asks for new option definitions; everything
        // else is treated as a recommendation request.
        let content = if prompt.contains("new career option definitions") {
            self.stub_new_options()
        } else {
            self.stub_recommendations()
        };

        let completion = LlmCompletion {
            prompt_hash: sha256_hex(prompt.as_bytes()),
            response_hash: sha256_hex(content.as_bytes()),
            content,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            latency_ms: 0,
        };
        log_completion("stub", &self.config.model, &completion);
        Ok(completion.content)
    }

    fn get_info(&self) -> LlmProviderInfo {
        LlmProviderInfo {
            name: "Stub".to_string(),
            version: "1.0".to_string(),
            model: self.config.model.clone(),
            capabilities: vec![
                "recommendation_generation".to_string(),
                "option_synthesis".to_string(),
            ],
        }
    }
}

fn preview(body: &str, max_chars: usize) -> String {
    if body.chars().count() > max_chars {
        let truncated: String = body.chars().take(max_chars).collect();
        format!(
            "{}... [truncated, {} chars total]",
            truncated,
            body.chars().count()
        )
    } else {
        body.to_string()
    }
}

/// Factory for creating LLM providers.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider based on configuration.
    pub fn create_provider(
        config: LlmProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, EngineError> {
        match config.provider_type {
            LlmProviderType::Stub => {
                // Only allow the stub in test mode or when explicitly enabled.
                let allow_stub = std::env::var("ADVISOR_ALLOW_STUB_PROVIDER")
                    .map(|v| v == "1" || v == "true")
                    .unwrap_or(false)
                    || cfg!(test);

                if !allow_stub {
                    return Err(EngineError::Configuration(
                        "Stub LLM provider is not allowed in production. Set ADVISOR_ALLOW_STUB_PROVIDER=1 to enable (for testing only), or use a real provider (openai, anthropic).".to_string()
                    ));
                }

                Ok(Box::new(StubLlmProvider::new(config)))
            }
            LlmProviderType::OpenAI => Ok(Box::new(OpenAILlmProvider::new(config)?)),
            LlmProviderType::Anthropic => Ok(Box::new(AnthropicLlmProvider::new(config)?)),
        }
    }
}
