//! Handshake payload definitions

use bot_core::Intents;
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Full authorization value, e.g. `Bot {app_id}.{token}`
    pub token: String,
    pub intents: Intents,
    /// `[shard_id, shard_count]`
    pub shard: [u32; 2],
    #[serde(default)]
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    /// Build an Identify payload; an empty intent mask is replaced by `GUILDS`
    pub fn new(token: impl Into<String>, intents: Intents, shard_id: u32, shard_count: u32) -> Self {
        Self {
            token: token.into(),
            intents: intents.or_default_guilds(),
            shard: [shard_id, shard_count.max(1)],
            properties: IdentifyProperties::default(),
        }
    }
}

/// Client connection properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    #[serde(rename = "$os", default)]
    pub os: String,
    #[serde(rename = "$browser", default)]
    pub browser: String,
    #[serde(rename = "$device", default)]
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: env!("CARGO_PKG_NAME").to_string(),
            device: String::new(),
        }
    }
}

/// Payload for op 6 (Resume)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePayload {
    pub token: String,
    pub session_id: String,
    /// Last sequence number received
    pub seq: u64,
}
