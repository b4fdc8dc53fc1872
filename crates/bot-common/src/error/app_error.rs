//! Application error types
//!
//! Top-level error for the bot process; library layers keep their own enums.

use bot_core::ApiError;

use crate::config::ConfigError;
use crate::telemetry::TracingError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TracingError),

    #[error("OpenAPI error: {0}")]
    Api(#[from] ApiError),

    /// Terminal gateway failure, carried as text to keep this crate below the engine
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get an error code string for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
            Self::Api(e) => e.code(),
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a gateway error from anything displayable
    pub fn gateway(err: impl std::fmt::Display) -> Self {
        Self::Gateway(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
