//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Language used when the client does not name one
pub const DEFAULT_LANGUAGE: &str = "english";

/// JSON body of `POST /api/summarize`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    /// Kept untyped so a non-string value is reported as a validation error
    #[serde(default)]
    pub text: Option<Value>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub summary_length: Option<String>,
}

/// Successful summarize response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Error body for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Normalize an optional client-supplied language
pub fn language_or_default(language: Option<&str>) -> String {
    language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_camel_case_fields() {
        let req: SummarizeRequest = serde_json::from_str(
            r#"{"text":"hello","language":"french","summaryLength":"long"}"#,
        )
        .unwrap();
        assert_eq!(req.text, Some(Value::String("hello".to_string())));
        assert_eq!(req.language.as_deref(), Some("french"));
        assert_eq!(req.summary_length.as_deref(), Some("long"));
    }

    #[test]
    fn test_request_missing_fields() {
        let req: SummarizeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.text.is_none());
        assert!(req.language.is_none());
    }

    #[test]
    fn test_language_or_default() {
        assert_eq!(language_or_default(None), "english");
        assert_eq!(language_or_default(Some("  ")), "english");
        assert_eq!(language_or_default(Some(" spanish ")), "spanish");
    }
}
