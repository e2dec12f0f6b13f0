//! Input validation and sanitization for text submitted for summarization

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Minimum number of characters after trimming
pub const MIN_TEXT_CHARS: usize = 50;

/// Maximum number of characters before sanitization
pub const MAX_TEXT_CHARS: usize = 10_000;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern is valid")
});

/// Reasons a text is rejected before summarization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text is required and must be a string")]
    InvalidType,

    #[error("Text must be at least 50 characters long")]
    TooShort,

    #[error("Text must not exceed 10000 characters")]
    TooLong,
}

/// Validate a JSON value that should hold the text to summarize
pub fn validate_text(candidate: Option<&Value>) -> Result<String, ValidationError> {
    match candidate {
        Some(Value::String(text)) => validate_str(text),
        _ => Err(ValidationError::InvalidType),
    }
}

/// Validate and clean a text, returning the trimmed sanitized string
pub fn validate_str(text: &str) -> Result<String, ValidationError> {
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong);
    }

    let cleaned = strip_scripts(text);
    let trimmed = cleaned.trim();

    if trimmed.chars().count() < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort);
    }

    Ok(trimmed.to_string())
}

/// Remove `<script>` blocks. Other markup is left untouched.
pub fn strip_scripts(text: &str) -> String {
    SCRIPT_BLOCK.replace_all(text, "").into_owned()
}
