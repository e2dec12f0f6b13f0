//! Summarization core
//!
//! - `validation`: rejects or cleans submitted text
//! - `fallback`: deterministic extractive summaries
//! - `remote`: chat-completion client
//! - `service`: picks the remote path or the fallback

pub mod circuit_breaker;
pub mod fallback;
pub mod remote;
pub mod service;
pub mod tier;
pub mod validation;

pub use remote::{ChatCompletionClient, RemoteSummarizer, UpstreamError};
pub use service::{SummaryMode, SummaryService};
pub use tier::{LengthTier, TierBudget};
pub use validation::{validate_str, validate_text, ValidationError};
