//! Gateway event types
//!
//! Event names carried in the `t` field of dispatch frames.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    // Session
    Ready,
    Resumed,

    // Guild and channel
    GuildCreate,
    GuildUpdate,
    GuildDelete,
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,

    // Members
    GuildMemberAdd,
    GuildMemberUpdate,
    GuildMemberRemove,

    // Messages
    MessageCreate,
    MessageDelete,
    MessageReactionAdd,
    MessageReactionRemove,
    /// Message that @-mentions the bot
    AtMessageCreate,
    PublicMessageDelete,
    DirectMessageCreate,
    DirectMessageDelete,
    MessageAuditPass,
    MessageAuditReject,

    // Audio
    AudioStart,
    AudioFinish,
    AudioOnMic,
    AudioOffMic,

    // Forum
    ForumThreadCreate,
    ForumThreadUpdate,
    ForumThreadDelete,
    ForumPostCreate,
    ForumPostDelete,
    ForumReplyCreate,
    ForumReplyDelete,
    ForumPublishAuditResult,

    InteractionCreate,
}

impl EventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildUpdate => "GUILD_UPDATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelUpdate => "CHANNEL_UPDATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            Self::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageDelete => "MESSAGE_DELETE",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
            Self::AtMessageCreate => "AT_MESSAGE_CREATE",
            Self::PublicMessageDelete => "PUBLIC_MESSAGE_DELETE",
            Self::DirectMessageCreate => "DIRECT_MESSAGE_CREATE",
            Self::DirectMessageDelete => "DIRECT_MESSAGE_DELETE",
            Self::MessageAuditPass => "MESSAGE_AUDIT_PASS",
            Self::MessageAuditReject => "MESSAGE_AUDIT_REJECT",
            Self::AudioStart => "AUDIO_START",
            Self::AudioFinish => "AUDIO_FINISH",
            Self::AudioOnMic => "AUDIO_ON_MIC",
            Self::AudioOffMic => "AUDIO_OFF_MIC",
            Self::ForumThreadCreate => "FORUM_THREAD_CREATE",
            Self::ForumThreadUpdate => "FORUM_THREAD_UPDATE",
            Self::ForumThreadDelete => "FORUM_THREAD_DELETE",
            Self::ForumPostCreate => "FORUM_POST_CREATE",
            Self::ForumPostDelete => "FORUM_POST_DELETE",
            Self::ForumReplyCreate => "FORUM_REPLY_CREATE",
            Self::ForumReplyDelete => "FORUM_REPLY_DELETE",
            Self::ForumPublishAuditResult => "FORUM_PUBLISH_AUDIT_RESULT",
            Self::InteractionCreate => "INTERACTION_CREATE",
        }
    }

    /// Parse an event type name
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "READY" => Self::Ready,
            "RESUMED" => Self::Resumed,
            "GUILD_CREATE" => Self::GuildCreate,
            "GUILD_UPDATE" => Self::GuildUpdate,
            "GUILD_DELETE" => Self::GuildDelete,
            "CHANNEL_CREATE" => Self::ChannelCreate,
            "CHANNEL_UPDATE" => Self::ChannelUpdate,
            "CHANNEL_DELETE" => Self::ChannelDelete,
            "GUILD_MEMBER_ADD" => Self::GuildMemberAdd,
            "GUILD_MEMBER_UPDATE" => Self::GuildMemberUpdate,
            "GUILD_MEMBER_REMOVE" => Self::GuildMemberRemove,
            "MESSAGE_CREATE" => Self::MessageCreate,
            "MESSAGE_DELETE" => Self::MessageDelete,
            "MESSAGE_REACTION_ADD" => Self::MessageReactionAdd,
            "MESSAGE_REACTION_REMOVE" => Self::MessageReactionRemove,
            "AT_MESSAGE_CREATE" => Self::AtMessageCreate,
            "PUBLIC_MESSAGE_DELETE" => Self::PublicMessageDelete,
            "DIRECT_MESSAGE_CREATE" => Self::DirectMessageCreate,
            "DIRECT_MESSAGE_DELETE" => Self::DirectMessageDelete,
            "MESSAGE_AUDIT_PASS" => Self::MessageAuditPass,
            "MESSAGE_AUDIT_REJECT" => Self::MessageAuditReject,
            "AUDIO_START" => Self::AudioStart,
            "AUDIO_FINISH" => Self::AudioFinish,
            "AUDIO_ON_MIC" => Self::AudioOnMic,
            "AUDIO_OFF_MIC" => Self::AudioOffMic,
            "FORUM_THREAD_CREATE" => Self::ForumThreadCreate,
            "FORUM_THREAD_UPDATE" => Self::ForumThreadUpdate,
            "FORUM_THREAD_DELETE" => Self::ForumThreadDelete,
            "FORUM_POST_CREATE" => Self::ForumPostCreate,
            "FORUM_POST_DELETE" => Self::ForumPostDelete,
            "FORUM_REPLY_CREATE" => Self::ForumReplyCreate,
            "FORUM_REPLY_DELETE" => Self::ForumReplyDelete,
            "FORUM_PUBLISH_AUDIT_RESULT" => Self::ForumPublishAuditResult,
            "INTERACTION_CREATE" => Self::InteractionCreate,
            _ => return None,
        })
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
