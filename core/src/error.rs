//! Error type for the waterlog API client.
//!
//! # Design
//! Every failure a call can hit collapses into one `ApiError`. Callers branch
//! on `status()` (present for HTTP and validation failures) or on
//! `is_aborted()`, never on a deeper hierarchy. The `Display` text keeps a
//! stable prefix per failure mode so logs stay greppable.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpMethod;

/// Errors returned by `HttpClient` and everything layered on top of it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status outside 2xx. `body` is the decoded
    /// JSON error payload, or `None` if the body was empty or not JSON.
    #[error("HTTP {status} for {method} {url}")]
    Http {
        method: HttpMethod,
        url: String,
        status: u16,
        body: Option<Value>,
    },

    /// The response was 2xx but the caller's validator rejected it.
    #[error("Response validation failed for {method} {url}")]
    Validation {
        method: HttpMethod,
        url: String,
        status: u16,
        body: Value,
    },

    /// The call was cancelled by the caller or its timeout elapsed.
    #[error("Request aborted (timeout or manual): {method} {url}")]
    Aborted { method: HttpMethod, url: String },

    /// Network failure, malformed JSON, or a body that does not fit the
    /// requested type.
    #[error("Network/Unknown error: {0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Validation { status, .. } => Some(*status),
            ApiError::Aborted { .. } | ApiError::Transport(_) => None,
        }
    }

    /// Response body carried by the error, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            ApiError::Validation { body, .. } => Some(body),
            ApiError::Aborted { .. } | ApiError::Transport(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
