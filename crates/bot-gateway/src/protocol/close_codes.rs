//! Gateway close codes
//!
//! Codes the server puts in the websocket close frame, with the retry policy for each.

/// Gateway websocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    InvalidOpcode,
    InvalidPayload,
    InvalidSessionId,
    InvalidSeq,
    /// Payloads sent too fast
    RateLimited,
    /// Connection expired; reconnect and resume
    SessionTimeout,
    InvalidShard,
    /// Too many guilds for one connection
    ShardingRequired,
    InvalidVersion,
    InvalidIntent,
    /// Intent not granted to this bot
    DisallowedIntent,
    /// 4900..=4913
    Internal(u16),
    /// Bot is delisted and may only connect to the sandbox
    BotOffline,
    BotBanned,
}

impl CloseCode {
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4001 => Some(Self::InvalidOpcode),
            4002 => Some(Self::InvalidPayload),
            4006 => Some(Self::InvalidSessionId),
            4007 => Some(Self::InvalidSeq),
            4008 => Some(Self::RateLimited),
            4009 => Some(Self::SessionTimeout),
            4010 => Some(Self::InvalidShard),
            4011 => Some(Self::ShardingRequired),
            4012 => Some(Self::InvalidVersion),
            4013 => Some(Self::InvalidIntent),
            4014 => Some(Self::DisallowedIntent),
            4900..=4913 => Some(Self::Internal(value)),
            4914 => Some(Self::BotOffline),
            4915 => Some(Self::BotBanned),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::InvalidOpcode => 4001,
            Self::InvalidPayload => 4002,
            Self::InvalidSessionId => 4006,
            Self::InvalidSeq => 4007,
            Self::RateLimited => 4008,
            Self::SessionTimeout => 4009,
            Self::InvalidShard => 4010,
            Self::ShardingRequired => 4011,
            Self::InvalidVersion => 4012,
            Self::InvalidIntent => 4013,
            Self::DisallowedIntent => 4014,
            Self::Internal(code) => code,
            Self::BotOffline => 4914,
            Self::BotBanned => 4915,
        }
    }

    /// Another connection attempt with the same configuration can succeed
    #[must_use]
    pub const fn can_reconnect(self) -> bool {
        !matches!(
            self,
            Self::InvalidShard
                | Self::ShardingRequired
                | Self::InvalidVersion
                | Self::InvalidIntent
                | Self::DisallowedIntent
                | Self::BotOffline
                | Self::BotBanned
        )
    }

    /// The session id and sequence are still valid after this close
    #[must_use]
    pub const fn can_resume(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::SessionTimeout | Self::Internal(_)
        )
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidOpcode => "Invalid opcode",
            Self::InvalidPayload => "Invalid payload",
            Self::InvalidSessionId => "Invalid session id",
            Self::InvalidSeq => "Invalid sequence number",
            Self::RateLimited => "Payloads sent too fast",
            Self::SessionTimeout => "Session timed out",
            Self::InvalidShard => "Invalid shard",
            Self::ShardingRequired => "Too many guilds, sharding required",
            Self::InvalidVersion => "Invalid version",
            Self::InvalidIntent => "Invalid intent",
            Self::DisallowedIntent => "Intent not permitted",
            Self::Internal(_) => "Internal server error",
            Self::BotOffline => "Bot is offline, sandbox only",
            Self::BotBanned => "Bot is banned",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}
