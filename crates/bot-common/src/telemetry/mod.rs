//! Logging setup for the bot binary

mod tracing_setup;

pub use tracing_setup::{
    try_init_tracing, try_init_tracing_with_config, LogFormat, TracingConfig, TracingError,
};
