//! Summarization orchestrator
//!
//! Chooses between the completion endpoint and the extractive fallback.
//! Once a text has passed validation a summary is always produced: upstream
//! failures are logged and answered from the fallback.

use super::fallback;
use super::remote::{ChatCompletionClient, RemoteSummarizer, UpstreamError};
use super::tier::LengthTier;
use crate::config::SummarizerConfig;
use crate::error::Result;
use crate::metrics::METRICS;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which paths the service can use for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    Remote,
    FallbackOnly,
}

pub struct SummaryService {
    remote: Option<Arc<dyn RemoteSummarizer>>,
}

impl SummaryService {
    /// Service that never calls out
    pub fn fallback_only() -> Self {
        Self { remote: None }
    }

    pub fn with_remote(remote: Arc<dyn RemoteSummarizer>) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    /// Build from configuration; the remote path exists only when a non-blank credential is set
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty());

        match api_key {
            Some(api_key) => {
                let client = ChatCompletionClient::new(config, api_key.clone())?;
                Ok(Self::with_remote(Arc::new(client)))
            }
            None => Ok(Self::fallback_only()),
        }
    }

    pub fn mode(&self) -> SummaryMode {
        if self.remote.is_some() {
            SummaryMode::Remote
        } else {
            SummaryMode::FallbackOnly
        }
    }

    /// Produce a summary for an already validated text
    pub async fn produce_summary(&self, text: &str, language: &str, tier: LengthTier) -> String {
        let Some(remote) = &self.remote else {
            debug!("No credential configured, using extractive summary");
            return self.fallback(text, language, tier);
        };

        match remote.summarize(text, language, tier).await {
            Ok(summary) => {
                METRICS.record_summary("remote");
                summary
            }
            Err(e) => {
                self.record_failure(&e);
                self.fallback(text, language, tier)
            }
        }
    }

    fn record_failure(&self, error: &UpstreamError) {
        METRICS.record_upstream_failure(error.reason_code());
        warn!(
            reason = error.reason_code(),
            "Remote summarization failed, using extractive summary: {}", error
        );
    }

    fn fallback(&self, text: &str, language: &str, tier: LengthTier) -> String {
        METRICS.record_summary("fallback");
        fallback::summarize(text, language, tier)
    }
}
