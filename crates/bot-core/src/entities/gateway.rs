//! Gateway access point returned by the OpenAPI

use serde::{Deserialize, Serialize};

/// Websocket access point with the recommended shard count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEndpoint {
    pub url: String,
    #[serde(default = "default_shards")]
    pub shards: u32,
    #[serde(default)]
    pub session_start_limit: SessionStartLimit,
}

/// Connection frequency limits attached to the access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStartLimit {
    pub total: u32,
    pub remaining: u32,
    /// Milliseconds until `remaining` resets
    pub reset_after: u32,
    pub max_concurrency: u32,
}

fn default_shards() -> u32 {
    1
}
