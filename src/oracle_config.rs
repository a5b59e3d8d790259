//! Oracle configuration: TOML file plus environment.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the API base URL.
pub const API_BASE_VAR: &str = "ORACLE_API_URL";

/// Groq-specific base URL variable, read when [`API_BASE_VAR`] is unset.
pub const GROQ_API_BASE_VAR: &str = "GROQ_API_URL";

/// Operation path some clients append to the base URL.
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Configuration for the LLM move oracle.
///
/// API keys are never read from the file, only from the environment
/// variable named by [`LlmProvider::api_key_var`].
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct OracleConfig {
    /// LLM provider (groq, openai or anthropic).
    #[serde(default)]
    provider: LlmProvider,

    /// Model name.
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for the reply.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    temperature: f32,

    /// Bound on a single oracle call, in seconds.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// API base URL overriding the provider default.
    #[serde(default)]
    api_base: Option<String>,
}

fn default_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_max_tokens() -> u32 {
    50
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            api_base: None,
        }
    }
}

impl OracleConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading oracle config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(provider = %config.provider, model = %config.model, "Oracle config loaded");
        Ok(config)
    }

    /// Applies the base URL override from the environment, if set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies the base URL override from `lookup`.
    ///
    /// [`API_BASE_VAR`] wins. For Groq, [`GROQ_API_BASE_VAR`] is accepted
    /// too, either as a base URL or as the full chat-completions URL.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |var: &'static str| {
            lookup(var)
                .filter(|url| !url.trim().is_empty())
                .map(|url| (var, url))
        };
        let found = set(API_BASE_VAR).or_else(|| match self.provider {
            LlmProvider::Groq => set(GROQ_API_BASE_VAR),
            _ => None,
        });

        if let Some((var, url)) = found {
            let url = url.trim().trim_end_matches('/');
            let base = url.strip_suffix(CHAT_COMPLETIONS_PATH).unwrap_or(url);
            debug!(var, api_base = %base, "API base overridden from environment");
            self.api_base = Some(base.to_string());
        }
        self
    }

    /// The oracle call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Creates an LLM configuration with the API key from the environment.
    ///
    /// Fails when the provider's key variable is unset or empty; the server
    /// then runs without an oracle.
    #[instrument(skip(self), fields(provider = %self.provider, model = %self.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        let var = self.provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(self.llm_config_with_key(api_key))
    }

    /// Creates an LLM configuration with an explicit API key.
    pub fn llm_config_with_key(&self, api_key: String) -> LlmConfig {
        let config = LlmConfig::new(self.provider, api_key, self.model.clone(), self.max_tokens)
            .with_temperature(self.temperature)
            .with_timeout(self.timeout());

        match &self.api_base {
            Some(api_base) => config.with_api_base(api_base.clone()),
            None => config,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
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
