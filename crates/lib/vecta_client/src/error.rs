//! Gateway error types.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use vecta_core::models::UrlDuplicateResponse;

/// Convenience alias for gateway call results.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        message: Option<String>,
        detail: Option<serde_json::Value>,
    },

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status, for errors the backend answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-provided error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            GatewayError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// The existing URL reported by a 409 on single submission.
    pub fn duplicate(&self) -> Option<UrlDuplicateResponse> {
        match self {
            GatewayError::Status {
                status: StatusCode::CONFLICT,
                detail: Some(detail),
                ..
            } => serde_json::from_value(detail.clone()).ok(),
            _ => None,
        }
    }
}

/// Error payload shapes the backend may return.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract a human-readable message from an error response body.
///
/// `detail` may be a string or a list of validation entries with `msg`.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    if let Some(message) = parsed.message {
        return Some(message);
    }
    match parsed.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

/// Raw `detail` of an error response body.
pub(crate) fn error_detail(body: &[u8]) -> Option<serde_json::Value> {
    serde_json::from_slice::<ErrorBody>(body).ok()?.detail
}
