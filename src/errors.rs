use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde_json::json;
use std::fmt;

/// Message shown when an external failure looks like an API key problem.
const API_KEY_HINT: &str = "Gemini API error: check your GEMINI_API_KEY in .env \
(valid key at https://makersuite.google.com/app/apikey).";

/// Fallback message for failures we do not want to show verbatim.
pub const GENERIC_ANALYZE_FAILURE: &str = "Failed to analyze profile. Please try again.";

/// Fixed message for any failure while generating recommendations.
pub const GENERIC_RECOMMENDATION_FAILURE: &str =
    "Failed to generate recommendations. Please try again.";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Invalid or incomplete request payload.
    Validation(String),
    /// The external model credential is absent or a placeholder.
    NotConfigured(String),
    /// The external model call failed (transport, auth, quota, bad status).
    ExternalApi(String),
    /// The model replied, but no parseable JSON object could be extracted.
    MalformedResponse(String),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            AppError::ExternalApi(msg) => write!(f, "External API error: {}", msg),
            AppError::MalformedResponse(msg) => write!(f, "Malformed model response: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each variant to a status code and a `{ success: false, error }`
    /// body. External failures are sanitized so stack traces and overly
    /// long messages never reach the client.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotConfigured(msg) => {
                tracing::warn!("Rejected request, service not configured: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            AppError::ExternalApi(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    sanitize_external_message(msg),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed model response: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ANALYZE_FAILURE.to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApi(err.to_string())
    }
}

/// Shapes an external failure message for the client.
///
/// API-key-looking failures (auth/quota statuses included) get a fixed
/// hint naming the env var. Short plain messages pass through; anything
/// long or containing stack-frame markers becomes a generic retry
/// message.
pub fn sanitize_external_message(msg: &str) -> String {
    let api_key_pattern = Regex::new(r"(?i)api key|invalid|401|403|429|quota|exhausted").unwrap();

    if api_key_pattern.is_match(msg) {
        API_KEY_HINT.to_string()
    } else if msg.len() < 200 && !msg.contains(" at ") {
        msg.to_string()
    } else {
        GENERIC_ANALYZE_FAILURE.to_string()
    }
}
