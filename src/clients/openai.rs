//! OpenAI-compatible chat-completions client

use crate::{
    execute_with_retry, AiClient, ApiError, ApiErrorType, CallTimer, ClientConfig, ClientError,
    ClientMetrics, Message, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Client for OpenAI's chat models and any API that speaks the same protocol
pub struct ChatGpt {
    /// Reqwest HTTP client used for requests
    http: Client,
    /// API key sent as a bearer token
    key: String,
    /// Full URL of the `chat/completions` endpoint
    endpoint: String,
    /// Configuration for the client
    config: ClientConfig,
    /// Per-client request metrics
    metrics: ClientMetrics,
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: RespMessage,
}

#[derive(Deserialize)]
struct RespMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatGpt {
    /// Create a new ChatGPT client
    pub fn new(http: Client, key: String, config: ClientConfig) -> Self {
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Self {
            http,
            key,
            endpoint,
            config,
            metrics: ClientMetrics::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, body: &Request<'_>) -> Result<(String, Option<TokenUsage>), ClientError> {
        self.metrics.record_attempt();
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), &text));
        }

        let resp: Response = response.json().await?;
        match resp.choices.into_iter().next().and_then(|c| c.message.content) {
            Some(content) if !content.trim().is_empty() => Ok((content, resp.usage)),
            _ => Err(ClientError::Api(ApiError {
                message: format!("No content in response from {}", self.config.model),
                status_code: Some(status.as_u16()),
                error_type: ApiErrorType::EmptyResponse,
            })),
        }
    }
}

#[async_trait]
impl AiClient for ChatGpt {
    #[instrument(skip(self, messages), fields(model = %self.config.model, messages = messages.len()))]
    async fn complete(&self, messages: &[Message], temperature: f32) -> Result<String, ClientError> {
        let body = Request {
            model: &self.config.model,
            messages,
            temperature,
            max_tokens: self.config.max_tokens,
        };

        let timer = CallTimer::start(&self.metrics);
        let result = execute_with_retry(self.config.retries, self.config.retry_base_delay, || async {
            self.send_once(&body).await
        })
        .await;

        match result {
            Ok((content, usage)) => {
                debug!(tokens = usage.map(|u| u.total()), "completion received");
                timer.finish(true, usage);
                Ok(content)
            }
            Err(e) => {
                timer.finish(false, None);
                Err(e)
            }
        }
    }

    /// Uses the configured temperature (`OPENAI_TEMPERATURE`)
    async fn send_prompt(&self, prompt: &str) -> Result<String, ClientError> {
        self.complete(&[Message::user(prompt)], self.config.temperature).await
    }

    fn name(&self) -> &str {
        "ChatGPT"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn metrics(&self) -> Option<&ClientMetrics> {
        Some(&self.metrics)
    }
}
