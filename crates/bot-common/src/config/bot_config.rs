//! Bot configuration
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use bot_core::{Intents, Token};
use serde::Deserialize;

/// Main bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub env: Environment,
    pub credentials: Credentials,
    pub api: ApiSettings,
    pub gateway: GatewaySettings,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Application credentials issued by the bot platform
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: u64,
    pub token: String,
}

impl Credentials {
    #[must_use]
    pub fn bot_token(&self) -> Token {
        Token::bot(self.app_id, self.token.clone())
    }
}

/// OpenAPI client settings
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub sandbox: bool,
    pub timeout_secs: u64,
}

impl ApiSettings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Gateway session settings
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub intents: Intents,
    pub queue_size: usize,
    pub provisional_heartbeat_ms: u64,
    pub reconnect_delay_ms: u64,
}

impl GatewaySettings {
    #[must_use]
    pub fn provisional_heartbeat(&self) -> Duration {
        Duration::from_millis(self.provisional_heartbeat_ms)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

// Default value functions
fn default_api_timeout_secs() -> u64 {
    3
}

fn default_queue_size() -> usize {
    10_000
}

fn default_provisional_heartbeat_ms() -> u64 {
    60_000
}

fn default_reconnect_delay_ms() -> u64 {
    3_000
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let intents = match lookup("BOT_INTENTS") {
            Some(raw) => Intents::parse(&raw)
                .map_err(|_| ConfigError::InvalidValue("BOT_INTENTS", raw))?,
            None => Intents::default(),
        };

        let config = Self {
            env,
            credentials: Credentials {
                app_id: required(&lookup, "BOT_APP_ID")?,
                token: lookup("BOT_TOKEN")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::MissingVar("BOT_TOKEN"))?,
            },
            api: ApiSettings {
                sandbox: parse_bool(&lookup, "BOT_SANDBOX")?,
                timeout_secs: nonzero(&lookup, "BOT_API_TIMEOUT_SECS")?
                    .unwrap_or_else(default_api_timeout_secs),
            },
            gateway: GatewaySettings {
                intents,
                queue_size: nonzero(&lookup, "GATEWAY_QUEUE_SIZE")?
                    .unwrap_or_else(default_queue_size),
                provisional_heartbeat_ms: nonzero(&lookup, "GATEWAY_PROVISIONAL_HEARTBEAT_MS")?
                    .unwrap_or_else(default_provisional_heartbeat_ms),
                reconnect_delay_ms: optional(&lookup, "GATEWAY_RECONNECT_DELAY_MS")?
                    .unwrap_or_else(default_reconnect_delay_ms),
            },
        };

        Ok(config)
    }
}

fn optional<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

/// Like [`optional`], but zero is rejected
fn nonzero<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default + PartialEq,
{
    match optional(lookup, key)? {
        Some(value) if value == T::default() => Err(ConfigError::InvalidValue(key, "0".to_string())),
        value => Ok(value),
    }
}

fn required<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    optional(lookup, key)?.ok_or(ConfigError::MissingVar(key))
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(false),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key, raw)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
