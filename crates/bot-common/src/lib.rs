//! # bot-common
//!
//! Process-level plumbing for the bot binary: environment configuration, the
//! application error type and tracing setup.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{ApiSettings, BotConfig, ConfigError, Credentials, Environment, GatewaySettings};
pub use error::{AppError, AppResult};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, LogFormat, TracingConfig, TracingError,
};
