//! Gateway intent bitflags
//!
//! Intents select which event categories the gateway delivers on a session.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Event categories a session subscribes to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u32 {
        /// Guild and channel lifecycle events
        const GUILDS                  = 1 << 0;
        /// Guild member add/update/remove
        const GUILD_MEMBERS           = 1 << 1;
        /// All guild messages (private bots only)
        const GUILD_MESSAGES          = 1 << 9;
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        const DIRECT_MESSAGE          = 1 << 12;
        const INTERACTION             = 1 << 26;
        const MESSAGE_AUDIT           = 1 << 27;
        const FORUMS_EVENT            = 1 << 28;
        const AUDIO_ACTION            = 1 << 29;
        /// Messages that @-mention the bot
        const PUBLIC_GUILD_MESSAGES   = 1 << 30;
    }
}

impl Intents {
    /// Substitute `GUILDS` for an empty mask; the gateway rejects Identify with no intents
    #[must_use]
    pub fn or_default_guilds(self) -> Self {
        if self.is_empty() {
            Self::GUILDS
        } else {
            self
        }
    }

    /// Parse from a decimal bitmask, keeping unknown bits
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.trim().parse::<u32>().map(Intents::from_bits_retain)
    }
}

impl Default for Intents {
    fn default() -> Self {
        Intents::PUBLIC_GUILD_MESSAGES
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// The wire format is a bare integer
impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Intents::from_bits_retain)
    }
}

impl From<u32> for Intents {
    fn from(bits: u32) -> Self {
        Intents::from_bits_retain(bits)
    }
}
