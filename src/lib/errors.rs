//! Error type shared by the storage, API and page layers, plus the formatter
//! that turns server error bodies into user-facing messages.

use serde_json::Value;
use std::fmt;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;
/// Message used when a failed response has no body.
pub const EMPTY_BODY_MESSAGE: &str = "Request failed.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
    Storage(String),
    Validation(String),
    Navigation(String),
}

impl AppError {
    /// HTTP status carried by the error, if it came from a server response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message without the category prefix, suitable for form alerts.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            AppError::Config(message)
            | AppError::Network(message)
            | AppError::Timeout(message)
            | AppError::Parse(message)
            | AppError::Serialization(message)
            | AppError::Storage(message)
            | AppError::Validation(message)
            | AppError::Navigation(message)
            | AppError::Http { message, .. } => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Storage(message) => write!(formatter, "Storage error: {message}"),
            AppError::Validation(message) => write!(formatter, "{message}"),
            AppError::Navigation(message) => write!(formatter, "Navigation error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

/// Extracts a user-facing message from an API error body.
///
/// Handles both error shapes the API produces: `{"detail": "..."}` for
/// domain errors and `{"detail": [{"msg": "..."}]}` for validation errors.
/// Anything else falls back to the trimmed, truncated body.
#[must_use]
pub fn error_message(body: &str) -> String {
    if let Some(detail) = detail_message(body) {
        return detail;
    }
    sanitize_body(body)
}

fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(entries) => {
            let msg = entries.first()?.get("msg")?;
            match msg {
                Value::String(msg) => Some(msg.clone()),
                other => Some(other.to_string()),
            }
        }
        _ => None,
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        EMPTY_BODY_MESSAGE.to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
