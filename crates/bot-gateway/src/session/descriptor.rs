//! Session descriptor
//!
//! Per-connection configuration handed to a [`GatewayClient`](crate::GatewayClient).
//! A non-empty `id` makes the next handshake a Resume.

use std::fmt;

use bot_core::{Intents, Token};

/// Shard this connection serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardConfig {
    pub shard_id: u32,
    pub shard_count: u32,
}

impl ShardConfig {
    /// `shard_count` is clamped to at least 1
    #[must_use]
    pub fn new(shard_id: u32, shard_count: u32) -> Self {
        Self {
            shard_id,
            shard_count: shard_count.max(1),
        }
    }
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    /// Session id from READY; empty until one is assigned
    pub id: String,
    pub url: String,
    pub token: Token,
    pub intents: Intents,
    /// Last dispatch sequence, 0 when none seen
    pub last_seq: u64,
    pub shards: ShardConfig,
}

impl Session {
    /// Fresh session that will Identify
    pub fn new(url: impl Into<String>, token: Token, intents: Intents, shards: ShardConfig) -> Self {
        Self {
            id: String::new(),
            url: url.into(),
            token,
            intents,
            last_seq: 0,
            shards,
        }
    }

    #[must_use]
    pub fn can_resume(&self) -> bool {
        !self.id.is_empty()
    }

    /// Drop the session id and sequence so the next attempt Identifies
    pub fn reset(&mut self) {
        self.id.clear();
        self.last_seq = 0;
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ws/session] app:{} shard:{}/{} id:{}",
            self.token.app_id, self.shards.shard_id, self.shards.shard_count, self.id
        )
    }
}
