//! LLM API client for OpenAI-compatible and Anthropic chat endpoints.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LlmProvider {
    /// Groq (OpenAI-compatible chat completions).
    #[default]
    Groq,
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding the API key for this provider.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Default API base URL for this provider, without the operation path.
    pub fn default_api_base(self) -> &'static str {
        match self {
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

/// Configuration for LLM client.
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct LlmConfig {
    #[setters(skip)]
    provider: LlmProvider,
    #[setters(skip)]
    api_key: String,
    #[setters(skip)]
    model: String,
    #[setters(skip)]
    max_tokens: u32,
    /// Sampling temperature.
    temperature: f32,
    /// API base URL overriding the provider default.
    #[setters(strip_option, into)]
    api_base: Option<String>,
    /// Upper bound on one Anthropic request, connection included.
    timeout: Duration,
}

impl LlmConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = %provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            temperature: 0.3,
            api_base: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Gets the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Gets the API base URL, falling back to the provider default.
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_base())
            .trim_end_matches('/')
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    openai: OpenAIClient<OpenAIConfig>,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = %config.provider(), api_base = %config.api_base()))]
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let openai = OpenAIClient::with_config(
            OpenAIConfig::new()
                .with_api_key(config.api_key.clone())
                .with_api_base(config.api_base()),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::new(format!("Failed to build HTTP client: {}", e)))?;

        info!("Creating LLM client");
        Ok(Self {
            config,
            openai,
            http,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generates a completion from a system prompt and user message.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = %self.config.provider, model = %self.config.model))]
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Generating completion");
        match self.config.provider {
            LlmProvider::Groq | LlmProvider::OpenAI => {
                self.generate_chat_completion(system_prompt, user_message)
                    .await
            }
            LlmProvider::Anthropic => self.generate_anthropic(system_prompt, user_message).await,
        }
    }

    /// Generates a completion through an OpenAI-compatible chat endpoint.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_chat_completion(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build system message");
                        LlmError::new(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        LlmError::new(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                LlmError::new(format!("Failed to build request: {}", e))
            })?;

        debug!(api_base = %self.config.api_base(), "Sending chat completion request");
        let response = self.openai.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "Chat completion API error");
            LlmError::new(format!("Chat completion API error: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in chat completion response");
                LlmError::new("No content in chat completion response".to_string())
            })?
            .trim()
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }

    /// Generates a completion using Anthropic Claude.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        debug!("Sending request to Anthropic");
        let response = self
            .http
            .post(format!("{}/messages", self.config.api_base()))
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read response");
            LlmError::new(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(LlmError::new(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        debug!(response_length = response_text.len(), "Parsing response");
        let response_json: serde_json::Value =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = ?e, response = %response_text, "Failed to parse response");
                LlmError::new(format!("Failed to parse response: {}", e))
            })?;

        let content = response_json["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Anthropic response");
                LlmError::new("No text content in Anthropic response".to_string())
            })?
            .trim()
            .to_string();

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_defaults_per_provider() {
        let config = LlmConfig::new(LlmProvider::Groq, "k".to_string(), "m".to_string(), 50);
        assert_eq!(config.api_base(), "https://api.groq.com/openai/v1");

        let config = LlmConfig::new(LlmProvider::Anthropic, "k".to_string(), "m".to_string(), 50);
        assert_eq!(config.api_base(), "https://api.anthropic.com/v1");
    }

    #[test]
    fn test_api_base_override_drops_trailing_slash() {
        let config = LlmConfig::new(LlmProvider::OpenAI, "k".to_string(), "m".to_string(), 50)
            .with_api_base("http://localhost:8080/v1/");
        assert_eq!(config.api_base(), "http://localhost:8080/v1");
    }
}
