mod fallback;
mod gemini;
mod openai;
mod prompt;
mod provider;

use async_trait::async_trait;
use std::time::Duration;

pub use fallback::{backup_task, dev_task, is_backup, BACKUP_MARKER, BACKUP_TASKS};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use prompt::build_prompt;
pub use provider::{Challenge, ChallengeProvider};

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while fetching a challenge from an upstream model
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("No challenge provider configured")]
    NotConfigured,

    #[error("Response parsing failed: {0}")]
    ParseError(String),
}

/// Request to generate a challenge text
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Full prompt text
    pub prompt: String,
    /// Maximum response length in tokens (provider-dependent)
    pub max_tokens: Option<u32>,
    /// Timeout for the request
    pub timeout: Duration,
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// The generated text, trimmed
    pub text: String,
    pub metadata: ResponseMetadata,
}

/// Metadata about the LLM response
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Name of the provider (e.g., "gemini", "openai")
    pub provider: String,
    pub model: String,
    /// Tokens consumed (if available)
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
}

/// Trait that all LLM providers must implement
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for the given prompt
    async fn generate(&self, request: GenerateRequest) -> ProviderResult<GenerateResponse>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}

/// Ordered set of providers; the first one that answers wins
pub struct LlmManager {
    pub providers: Vec<Box<dyn LlmProvider>>,
}

impl LlmManager {
    pub fn new(providers: Vec<Box<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    /// Try each provider in order and return the first successful response.
    /// If all of them fail, the last error is returned.
    pub async fn generate_first(
        &self,
        request: GenerateRequest,
    ) -> ProviderResult<(String, GenerateResponse)> {
        let mut last_error = ProviderError::NotConfigured;

        for provider in &self.providers {
            match provider.generate(request.clone()).await {
                Ok(response) if response.text.is_empty() => {
                    tracing::warn!("Provider {} returned an empty challenge", provider.name());
                    last_error = ProviderError::ParseError("Empty challenge text".to_string());
                }
                Ok(response) => {
                    tracing::debug!(
                        "Provider {} answered in {}ms (model {}, tokens {:?})",
                        provider.name(),
                        response.metadata.latency_ms,
                        response.metadata.model,
                        response.metadata.tokens_used
                    );
                    return Ok((provider.name().to_string(), response));
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {}", provider.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

/// Configuration for challenge generation
#[derive(Debug, Clone)]
pub struct ChallengeConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
    /// Skip the network entirely and serve backup tasks
    pub offline: bool,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-flash-lite-latest".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(15),
            max_tokens: 120,
            offline: false,
        }
    }
}

/// Read an env var, treating blank values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn env_flag(name: &str) -> bool {
    env_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl ChallengeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            gemini_api_key: env_var("GEMINI_API_KEY").or_else(|| env_var("VITE_GEMINI_KEY")),
            gemini_model: env_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: env_var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            openai_api_key: env_var("OPENAI_API_KEY"),
            openai_model: env_var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            timeout: env_var("CHALLENGE_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_tokens: env_var("CHALLENGE_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            offline: env_flag("CHALLENGE_OFFLINE"),
        }
    }

    /// Build an LlmManager with all configured providers, Gemini first
    pub fn build_manager(&self) -> ProviderResult<LlmManager> {
        let mut providers: Vec<Box<dyn LlmProvider>> = Vec::new();

        if let Some(api_key) = &self.gemini_api_key {
            providers.push(Box::new(GeminiProvider::new(
                self.gemini_base_url.clone(),
                api_key.clone(),
                self.gemini_model.clone(),
            )?));
        }

        if let Some(api_key) = &self.openai_api_key {
            providers.push(Box::new(OpenAiProvider::new(
                api_key.clone(),
                self.openai_model.clone(),
            )));
        }

        if providers.is_empty() {
            return Err(ProviderError::ConfigError(
                "No challenge providers configured. Set GEMINI_API_KEY or OPENAI_API_KEY"
                    .to_string(),
            ));
        }

        Ok(LlmManager::new(providers))
    }
}
