use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::error::ApiError;
use super::models::{language_or_default, HealthResponse, SummarizeRequest, SummaryResponse};
use crate::extract::{extract_text, DocumentKind};
use crate::metrics::METRICS;
use crate::summarize::{validate_str, validate_text, LengthTier, SummaryService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SummaryService>,
}

impl AppState {
    pub fn new(service: SummaryService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Validated input ready for the summary service
struct SummaryInput {
    text: String,
    language: String,
    tier: LengthTier,
}

/// Summarize a JSON text block or an uploaded document
///
/// POST /api/summarize
pub async fn summarize(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<SummaryResponse>, ApiError> {
    let start = Instant::now();

    let is_upload = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);
    let source = if is_upload { "upload" } else { "json" };

    let input = if is_upload {
        read_upload(&state, request).await
    } else {
        read_json(&state, request).await
    };

    let result = match input {
        Ok(input) => {
            info!(
                "Summarize request: source={}, chars={}, language={}, length={}",
                source,
                input.text.chars().count(),
                input.language,
                input.tier
            );
            let summary = state
                .service
                .produce_summary(&input.text, &input.language, input.tier)
                .await;
            Ok(Json(SummaryResponse { summary }))
        }
        Err(e) => Err(e),
    };

    let status = match &result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    };
    METRICS.record_request(status, source, start.elapsed().as_secs_f64());

    result
}

async fn read_json(state: &AppState, request: Request) -> Result<SummaryInput, ApiError> {
    let body = Bytes::from_request(request, state)
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;

    let request: SummarizeRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?;

    Ok(SummaryInput {
        text: validate_text(request.text.as_ref())?,
        language: language_or_default(request.language.as_deref()),
        tier: LengthTier::parse_or_default(request.summary_length.as_deref()),
    })
}

async fn read_upload(state: &AppState, request: Request) -> Result<SummaryInput, ApiError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;

    let mut upload: Option<(String, DocumentKind, Bytes)> = None;
    let mut language: Option<String> = None;
    let mut summary_length: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().map(|n| n.to_string());

        match name.as_deref() {
            Some("language") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                language = Some(value);
            }
            Some("summaryLength") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                summary_length = Some(value);
            }
            _ => {
                let Some(filename) = field.file_name().map(|s| s.to_string()) else {
                    continue;
                };
                if upload.is_some() {
                    continue;
                }
                // Reject by extension before buffering the body
                let kind = DocumentKind::from_filename(&filename)?;

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
                upload = Some((filename, kind, bytes));
            }
        }
    }

    let (filename, kind, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    debug!(
        "Extracting {} text from {} ({} bytes)",
        kind.as_str(),
        filename,
        bytes.len()
    );

    let text = tokio::task::spawn_blocking(move || extract_text(&filename, &bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {}", e)))??;

    Ok(SummaryInput {
        text: validate_str(&text)?,
        language: language_or_default(language.as_deref()),
        tier: LengthTier::parse_or_default(summary_length.as_deref()),
    })
}

/// Liveness check
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Prometheus scrape endpoint
///
/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}
