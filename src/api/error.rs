//! HTTP error mapping
//!
//! Validation failures are echoed to the client. Anything unexpected is
//! logged here and replaced by a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::models::ErrorBody;
use crate::extract::ExtractError;
use crate::summarize::ValidationError;

/// Message returned for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to process the request";

/// Message returned when the request body exceeds the upload limit
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "File too large. Maximum upload size exceeded";

#[derive(Debug)]
pub enum ApiError {
    /// Rejected input; the message is shown to the client
    BadRequest(String),

    PayloadTooLarge,

    /// Unexpected failure; the detail is logged, never returned
    Internal(String),
}

impl ApiError {
    /// Map an axum extractor rejection by its status
    pub fn from_rejection(status: StatusCode, body_text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else if status.is_client_error() {
            ApiError::BadRequest(body_text)
        } else {
            ApiError::Internal(body_text)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used in request metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::Internal(_) => "error",
            _ => "rejected",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(message) => message,
            ApiError::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            ApiError::Internal(detail) => {
                error!("Summarize request failed: {}", detail);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
