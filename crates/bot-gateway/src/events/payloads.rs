//! Dispatch event payloads
//!
//! Typed views of the `d` field of op 0 frames, decoded once `t` is known.

use bot_core::{Message, User};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::value::RawValue;

use super::EventType;
use crate::error::CodecError;

/// READY - sent after a successful Identify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyEvent {
    #[serde(default)]
    pub version: u32,
    /// Session id used for Resume
    pub session_id: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub shard: [u32; 2],
}

/// Decoded dispatch event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    Ready(ReadyEvent),
    Resumed,
    AtMessageCreate(Message),
    MessageCreate(Message),
    DirectMessageCreate(Message),
    /// Any other event, by name; the raw data stays on the envelope
    Other(String),
}

impl DispatchEvent {
    /// Decode the data of a dispatch frame with event type `t`
    pub fn decode(t: Option<&str>, d: Option<&RawValue>) -> Result<Self, CodecError> {
        let name = t.ok_or_else(|| CodecError::PayloadDecode("dispatch without event type".to_string()))?;

        Ok(match EventType::from_str(name) {
            Some(EventType::Ready) => Self::Ready(decode_data(name, d)?),
            Some(EventType::Resumed) => Self::Resumed,
            Some(EventType::AtMessageCreate) => Self::AtMessageCreate(decode_data(name, d)?),
            Some(EventType::MessageCreate) => Self::MessageCreate(decode_data(name, d)?),
            Some(EventType::DirectMessageCreate) => {
                Self::DirectMessageCreate(decode_data(name, d)?)
            }
            _ => Self::Other(name.to_string()),
        })
    }

    /// Event name as sent on the wire
    pub fn name(&self) -> &str {
        match self {
            Self::Ready(_) => EventType::Ready.as_str(),
            Self::Resumed => EventType::Resumed.as_str(),
            Self::AtMessageCreate(_) => EventType::AtMessageCreate.as_str(),
            Self::MessageCreate(_) => EventType::MessageCreate.as_str(),
            Self::DirectMessageCreate(_) => EventType::DirectMessageCreate.as_str(),
            Self::Other(name) => name,
        }
    }
}

fn decode_data<T: DeserializeOwned>(name: &str, d: Option<&RawValue>) -> Result<T, CodecError> {
    let raw = d.ok_or_else(|| CodecError::PayloadDecode(format!("{name}: missing data")))?;
    serde_json::from_str(raw.get()).map_err(|e| CodecError::PayloadDecode(format!("{name}: {e}")))
}
