//! Chat-completion client for remote summarization

use super::circuit_breaker::{BreakerState, CircuitBreaker, CircuitBreakerConfig};
use super::tier::LengthTier;
use crate::config::SummarizerConfig;
use crate::error::{Error, Result};
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Sampling temperature sent with every request
pub const TEMPERATURE: f32 = 0.5;

/// Remote summarization strategy
#[async_trait]
pub trait RemoteSummarizer: Send + Sync {
    /// Summarize `text` in `language` at the requested length
    async fn summarize(
        &self,
        text: &str,
        language: &str,
        tier: LengthTier,
    ) -> std::result::Result<String, UpstreamError>;
}

/// Why a remote summarization attempt produced no summary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream returned HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Unexpected upstream response: {0}")]
    Format(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Circuit breaker is open")]
    CircuitOpen,
}

impl UpstreamError {
    /// Stable identifier for logs and metrics
    pub fn reason_code(&self) -> &'static str {
        match self {
            UpstreamError::Http { .. } => "http_error",
            UpstreamError::Format(_) => "format_error",
            UpstreamError::Network(_) => "network_error",
            UpstreamError::CircuitOpen => "circuit_open",
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Network(_) => true,
            UpstreamError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Build the single user message sent to the model
pub fn build_prompt(text: &str, language: &str, tier: LengthTier) -> String {
    format!(
        "Please summarize the following text in {}. Provide a {} summary that captures \
        the main points.\n\nText:\n{}",
        language,
        tier.budget().descriptor,
        text
    )
}

/// OpenAI-compatible chat-completion client
pub struct ChatCompletionClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
    max_retries: usize,
    retry_backoff: Duration,
    breaker: CircuitBreaker,
}

impl ChatCompletionClient {
    /// Create a new client; the credential comes from configuration resolved at startup
    pub fn new(config: &SummarizerConfig, api_key: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: config.circuit_breaker_failures,
            reset_timeout: config.breaker_reset_timeout(),
        });

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff(),
            breaker,
        })
    }

    fn build_request(&self, text: &str, language: &str, tier: LengthTier) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(text, language, tier),
            }],
            max_tokens: tier.budget().max_tokens,
            temperature: TEMPERATURE,
        }
    }

    async fn call_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> std::result::Result<String, UpstreamError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Completion endpoint error body: {}", body);
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        extract_content(&body)
    }

    fn report_breaker(&self) {
        METRICS.record_breaker_open(self.breaker.state() == BreakerState::Open);
    }

    /// Calculate exponential backoff
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let multiplier = 2_u32.saturating_pow(attempt.saturating_sub(1) as u32);
        self.retry_backoff.saturating_mul(multiplier)
    }
}

#[async_trait]
impl RemoteSummarizer for ChatCompletionClient {
    async fn summarize(
        &self,
        text: &str,
        language: &str,
        tier: LengthTier,
    ) -> std::result::Result<String, UpstreamError> {
        if self.breaker.is_open() {
            return Err(UpstreamError::CircuitOpen);
        }

        let request = self.build_request(text, language, tier);
        debug!(
            "Requesting {} summary in {} ({} chars, max_tokens={})",
            tier,
            language,
            text.chars().count(),
            request.max_tokens
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            let start = Instant::now();
            let result = self.call_once(&request).await;
            METRICS.record_upstream_call(result.is_ok(), start.elapsed().as_secs_f64());

            match result {
                Ok(summary) => {
                    self.breaker.mark_success();
                    self.report_breaker();
                    return Ok(summary);
                }
                Err(e) => {
                    self.breaker.mark_failure();
                    self.report_breaker();

                    if !e.is_retryable() || attempt > self.max_retries {
                        return Err(e);
                    }
                    if self.breaker.is_open() {
                        debug!(
                            "Circuit breaker opened, abandoning retries after attempt {}",
                            attempt
                        );
                        return Err(e);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "Summarization attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Pull `choices[0].message.content` out of a response body
fn extract_content(body: &str) -> std::result::Result<String, UpstreamError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::Format(format!("invalid JSON: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| UpstreamError::Format("missing choices[0].message.content".to_string()))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(UpstreamError::Format("empty completion content".to_string()));
    }

    Ok(content.to_string())
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
