//! Errors returned by event handlers
//!
//! The dispatch loop logs these and moves on to the next event; they never
//! close the connection.

use bot_core::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// The event lacks data the handler needs
    #[error("Unusable event: {0}")]
    Unusable(String),

    #[error("OpenAPI call failed: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Business(String),
}

impl HandlerError {
    pub fn business(message: impl Into<String>) -> Self {
        Self::Business(message.into())
    }

    /// Short label for the `kind` log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unusable(_) => "unusable",
            Self::Api(_) => "api",
            Self::Business(_) => "business",
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
