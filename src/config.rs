//! Service configuration
//!
//! Values are layered from `config/default.toml`, `config/local.toml` and
//! `APP__`-prefixed environment variables (for example
//! `APP__SERVER__PORT=8080`). The conventional `PORT`, `AI_API_KEY`,
//! `AI_API_URL` and `AI_MODEL` variables are applied last.

use crate::error::Result;
use config::{Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for paths not handled by the API
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Largest accepted request body, uploads included
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_static_dir() -> String { "public".to_string() }
fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Completion endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// Chat-completion URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token. Without it every request uses the extractive fallback.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra attempts after a retryable failure (0 = single attempt)
    #[serde(default)]
    pub max_retries: usize,

    /// Base backoff in milliseconds, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Consecutive failures before the breaker opens (0 disables it)
    #[serde(default = "default_breaker_failures")]
    pub circuit_breaker_failures: usize,

    /// Seconds before an open breaker lets a trial call through
    #[serde(default = "default_breaker_reset")]
    pub circuit_breaker_reset_secs: u64,
}

fn default_endpoint() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model() -> String { "gpt-3.5-turbo".to_string() }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_retry_backoff_ms() -> u64 { 200 }
fn default_breaker_failures() -> usize { 5 }
fn default_breaker_reset() -> u64 { 30 }

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
            circuit_breaker_failures: default_breaker_failures(),
            circuit_breaker_reset_secs: default_breaker_reset(),
        }
    }
}

impl SummarizerConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Get circuit breaker reset timeout as Duration
    pub fn breaker_reset_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_reset_secs)
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from the default file locations and the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize::<Config>()?;

        Ok(config.apply_env_overrides())
    }

    /// Load configuration from a single file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize::<Config>()?;

        Ok(config)
    }

    /// Apply the conventional unprefixed environment variables
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = std::env::var("AI_API_KEY") {
            if !val.trim().is_empty() {
                self.summarizer.api_key = Some(SecretString::new(val));
            }
        }

        if let Ok(val) = std::env::var("AI_API_URL") {
            self.summarizer.endpoint = val;
        }

        if let Ok(val) = std::env::var("AI_MODEL") {
            self.summarizer.model = val;
        }

        self
    }
}
