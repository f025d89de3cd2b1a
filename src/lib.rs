//! # promptlift
//!
//! Prompt quality analysis and LLM-backed prompt optimization.
//!
//! The crate scores a natural-language prompt with lexical and structural
//! heuristics, asks an LLM to grade it against a fixed rubric, picks
//! optimization strategies from the weak spots, has the LLM rewrite the
//! prompt and then grades the rewrite again.
//!
//! ## Example
//!
//! ```rust,no_run
//! use promptlift::{create_client, AiPromptOptimizer, ClientConfig, OptimizationContext, OptimizationType, PromptOptimizer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = create_client(&config)?;
//!
//!     let optimizer = AiPromptOptimizer::new(client);
//!     let context = OptimizationContext::new(OptimizationType::Code);
//!     let result = optimizer.optimize("write a function that sorts numbers", &context).await?;
//!
//!     println!("{} -> {}", result.quality_score_before, result.quality_score_after);
//!     println!("{}", result.optimized_prompt);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub mod analyzer;
pub mod classifier;
pub mod clients;
pub mod error;
pub mod features;
pub mod http;
pub mod insights;
pub mod metrics;
pub mod observability;
pub mod parsing;
pub mod prompt_optimizer;
pub mod quality;
pub mod strategy;
pub mod structure;
pub mod usage;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use analyzer::{AnalysisResult, PromptAnalyzer};
pub use classifier::{ComplexityLevel, PromptType};
pub use clients::*;
pub use error::*;
pub use features::PromptFeatures;
pub use http::HttpConfig;
pub use metrics::{CallTimer, ClientMetrics, MetricsSnapshot, TokenUsage};
pub use prompt_optimizer::{
    batch_optimize, AiPromptOptimizer, Improvement, OptimizationContext, OptimizationResult,
    OptimizationType, PromptOptimizer,
};
pub use quality::{
    EvaluationMode, Grade, PromptComparison, QualityCriterion, QualityEvaluator, QualityReport,
    QualityScore, Recommendation,
};
pub use strategy::{OptimizationStrategy, StrategySelector};
pub use structure::PromptStructure;
pub use usage::{UsageEstimator, UsageStats};
pub use utils::execute_with_retry;

/// Longest prompt accepted, in characters
pub const MAX_PROMPT_CHARS: usize = 10_000;

/// Most prompts accepted by one batch request
pub const MAX_BATCH_SIZE: usize = 10;

/// Default for [`ClientConfig::temperature`] and for clients without a config
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Configuration for the LLM backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key; required by [`create_client`]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Timeout for HTTP requests
    pub timeout: Duration,
    /// Number of retry attempts for failed requests
    pub retries: u32,
    /// Delay before the first retry; doubles on every further attempt
    pub retry_base_delay: Duration,
    /// Temperature used by [`AiClient::send_prompt`]
    pub temperature: f32,
    /// Maximum tokens for responses
    pub max_tokens: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout: Duration::from_secs(30),
            retries: 2,
            retry_base_delay: Duration::from_secs(1),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: 1500,
        }
    }
}

impl ClientConfig {
    /// Build a configuration from environment variables.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`,
    /// `OPENAI_MAX_TOKENS`, `OPENAI_TEMPERATURE`, `PROMPTLIFT_TIMEOUT_SECS`
    /// and `PROMPTLIFT_RETRIES`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::default();

        config.api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(max_tokens) = parse_env("OPENAI_MAX_TOKENS")? {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = parse_env("OPENAI_TEMPERATURE")? {
            config.temperature = temperature;
        }
        if let Some(secs) = parse_env::<u64>("PROMPTLIFT_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_env("PROMPTLIFT_RETRIES")? {
            config.retries = retries;
        }

        Ok(config)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ClientError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ClientError::config(format!("cannot parse value {raw:?}"), Some(name.to_string()))
        }),
        Err(_) => Ok(None),
    }
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message sent to the LLM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Text-completion service used by every LLM-backed component.
///
/// Implementations own their retry and backoff policy: an `Err` returned
/// from [`AiClient::complete`] means the service stayed unavailable.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Sends a chat transcript and returns the assistant's reply
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String, ClientError>;

    /// Sends a single user prompt at the client's configured temperature
    async fn send_prompt(&self, prompt: &str) -> Result<String, ClientError> {
        self.complete(&[Message::user(prompt)], DEFAULT_TEMPERATURE).await
    }

    /// Returns the name/identifier of this AI client
    fn name(&self) -> &str;

    /// Returns the model being used by this client
    fn model(&self) -> &str;

    /// Request metrics, when the backend records them
    fn metrics(&self) -> Option<&ClientMetrics> {
        None
    }
}

/// Build the LLM backend described by `config`.
///
/// Credentials are checked here, once, so a missing key fails at startup
/// rather than on the first request.
///
/// # Example
///
/// ```rust,no_run
/// use promptlift::{create_client, ClientConfig};
///
/// let config = ClientConfig {
///     api_key: Some("your-api-key".to_string()),
///     ..ClientConfig::default()
/// };
/// let client = create_client(&config)?;
/// # Ok::<(), promptlift::ClientError>(())
/// ```
pub fn create_client(config: &ClientConfig) -> Result<Arc<dyn AiClient>, ClientError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ClientError::missing_api_key("OPENAI_API_KEY is not configured"))?;

    let http_client = HttpConfig::with_request_timeout(config.timeout)
        .build_client()
        .map_err(|e| ClientError::config(format!("Failed to create HTTP client: {}", e), None))?;

    Ok(Arc::new(ChatGpt::new(http_client, api_key.to_string(), config.clone())))
}

/// Outcome of [`health_check`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub model: String,
    /// Round trip in seconds
    pub response_time: f64,
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_available(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Probe the backend with a trivial prompt
pub async fn health_check(client: &dyn AiClient) -> HealthStatus {
    let start = Instant::now();
    let result = client.send_prompt("Hello").await;
    let response_time = start.elapsed().as_secs_f64();

    match result {
        Ok(_) => HealthStatus {
            status: HealthState::Healthy,
            model: client.model().to_string(),
            response_time,
            error: None,
        },
        Err(e) => HealthStatus {
            status: HealthState::Unhealthy,
            model: client.model().to_string(),
            response_time,
            error: Some(e.to_string()),
        },
    }
}

/// Trim `text` and reject empty or oversized prompts
pub fn validate_prompt(text: &str) -> Result<&str, OptimizerError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(OptimizerError::invalid_input("prompt must not be empty"));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_PROMPT_CHARS {
        return Err(OptimizerError::invalid_input(format!(
            "prompt is {} characters long, the limit is {}",
            chars, MAX_PROMPT_CHARS
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retries, 2);
        assert_eq!(config.max_tokens, 1500);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_create_client_requires_api_key() {
        let err = create_client(&ClientConfig::default()).err().unwrap();
        assert!(matches!(
            err,
            ClientError::Authentication(AuthError { error_type: AuthErrorType::MissingApiKey, .. })
        ));

        let config = ClientConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4".to_string(),
            ..ClientConfig::default()
        };
        let client = create_client(&config).unwrap();
        assert_eq!(client.model(), "gpt-4");
        assert!(client.metrics().is_some());
    }

    #[test]
    fn test_validate_prompt() {
        assert_eq!(validate_prompt("  hello  ").unwrap(), "hello");
        assert!(matches!(validate_prompt("   \n"), Err(OptimizerError::InvalidInput { .. })));
        assert!(validate_prompt(&"a".repeat(MAX_PROMPT_CHARS)).is_ok());
        assert!(validate_prompt(&"a".repeat(MAX_PROMPT_CHARS + 1)).is_err());
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(Message::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[tokio::test]
    async fn test_send_prompt_uses_default_temperature() {
        let client = ScriptedClient::new(vec![Ok("hi".to_string())]);
        let reply = client.send_prompt("Hello").await.unwrap();
        assert_eq!(reply, "hi");

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, DEFAULT_TEMPERATURE);
        assert_eq!(calls[0].messages, vec![Message::user("Hello")]);
    }

    #[tokio::test]
    async fn test_health_check() {
        let healthy = ScriptedClient::new(vec![Ok("hi".to_string())]);
        let status = health_check(&healthy).await;
        assert!(status.is_available());
        assert_eq!(status.model, "mock-model");

        let down = ScriptedClient::new(vec![Err(ClientError::timeout("no answer"))]);
        let status = health_check(&down).await;
        assert_eq!(status.status, HealthState::Unhealthy);
        assert!(status.error.unwrap().contains("no answer"));
    }
}
