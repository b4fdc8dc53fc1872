//! OpenAPI errors - failures reported through the [`OpenApi`](crate::OpenApi) port

use thiserror::Error;

/// OpenAPI call errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success status from the platform
    #[error("HTTP {status}: {body} (trace id: {trace_id})")]
    Http {
        status: u16,
        body: String,
        trace_id: String,
    },

    /// Request never produced a response (DNS, TLS, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http { .. } => "HTTP_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Transport(_) => true,
            Self::Decode(_) | Self::InvalidRequest(_) => false,
        }
    }
}

/// Result type for OpenAPI operations
pub type ApiResult<T> = Result<T, ApiError>;
