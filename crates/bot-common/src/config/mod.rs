//! Configuration structs

mod bot_config;

pub use bot_config::{ApiSettings, BotConfig, ConfigError, Credentials, Environment, GatewaySettings};
