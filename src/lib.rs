//! Document summarization service
//!
//! Accepts raw text or an uploaded PDF/DOCX/TXT file and returns a summary.
//! Summaries come from an OpenAI-compatible completion endpoint when a
//! credential is configured, and from a deterministic extractive summarizer
//! otherwise or whenever the endpoint fails.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod observability;
pub mod summarize;

pub use crate::config::Config;
pub use error::{Error, Result};
pub use summarize::{LengthTier, SummaryService};
