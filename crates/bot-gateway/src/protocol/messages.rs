//! Gateway frame envelope
//!
//! `{ "op": int, "s": uint?, "t": string?, "d": any? }`. The `d` field is kept
//! as raw JSON and decoded on demand once `op` and `t` are known.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::value::{to_raw_value, RawValue};

use super::{HelloPayload, IdentifyPayload, OpCode, ResumePayload};
use crate::error::CodecError;
use crate::events::DispatchEvent;

/// Gateway message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Sequence number (dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event type (dispatch only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Box<RawValue>>,
}

/// Typed view of a frame's data, selected by op code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Dispatch(DispatchEvent),
    Heartbeat(Option<u64>),
    Identify(IdentifyPayload),
    Resume(ResumePayload),
    Reconnect,
    InvalidSession,
    Hello(HelloPayload),
    HeartbeatAck,
    HttpCallbackAck,
    /// Op code outside the known table; `d` is left undecoded
    Unknown(u8),
}

// Integers and plain data structs always serialize
fn embed<T: Serialize + ?Sized>(value: &T) -> Option<Box<RawValue>> {
    to_raw_value(value).ok()
}

impl GatewayMessage {
    fn bare(op: OpCode) -> Self {
        Self {
            op,
            s: None,
            t: None,
            d: None,
        }
    }

    /// Heartbeat (op=1); `d` is the last sequence, or `null` before any dispatch
    #[must_use]
    pub fn heartbeat(last_seq: Option<u64>) -> Self {
        Self {
            d: embed(&last_seq),
            ..Self::bare(OpCode::Heartbeat)
        }
    }

    #[must_use]
    pub fn identify(payload: &IdentifyPayload) -> Self {
        Self {
            d: embed(payload),
            ..Self::bare(OpCode::Identify)
        }
    }

    #[must_use]
    pub fn resume(payload: &ResumePayload) -> Self {
        Self {
            d: embed(payload),
            ..Self::bare(OpCode::Resume)
        }
    }

    /// Dispatch (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, seq: u64, data: &serde_json::Value) -> Self {
        Self {
            s: Some(seq),
            t: Some(event_type.into()),
            d: embed(data),
            ..Self::bare(OpCode::Dispatch)
        }
    }

    #[must_use]
    pub fn hello(heartbeat_interval: u64) -> Self {
        Self {
            d: embed(&HelloPayload::with_interval(heartbeat_interval)),
            ..Self::bare(OpCode::Hello)
        }
    }

    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck)
    }

    #[must_use]
    pub fn reconnect() -> Self {
        Self::bare(OpCode::Reconnect)
    }

    #[must_use]
    pub fn invalid_session() -> Self {
        Self {
            d: embed(&false),
            ..Self::bare(OpCode::InvalidSession)
        }
    }

    /// Decode a frame
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::MalformedFrame(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::MalformedFrame(e.to_string()))
    }

    /// Deserialize the embedded `d` field
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        let raw = self
            .d
            .as_ref()
            .ok_or_else(|| CodecError::PayloadDecode(format!("{}: missing data", self.op)))?;
        serde_json::from_str(raw.get())
            .map_err(|e| CodecError::PayloadDecode(format!("{}: {e}", self.op)))
    }

    /// Decode `d` into the variant matching this frame's op code
    pub fn payload(&self) -> Result<Payload, CodecError> {
        Ok(match self.op {
            OpCode::Dispatch => {
                Payload::Dispatch(DispatchEvent::decode(self.t.as_deref(), self.d.as_deref())?)
            }
            OpCode::Heartbeat => Payload::Heartbeat(match self.d {
                Some(_) => self.data()?,
                None => None,
            }),
            OpCode::Identify => Payload::Identify(self.data()?),
            OpCode::Resume => Payload::Resume(self.data()?),
            OpCode::Reconnect => Payload::Reconnect,
            OpCode::InvalidSession => Payload::InvalidSession,
            OpCode::Hello => Payload::Hello(self.data()?),
            OpCode::HeartbeatAck => Payload::HeartbeatAck,
            OpCode::HttpCallbackAck => Payload::HttpCallbackAck,
            OpCode::Unknown(value) => Payload::Unknown(value),
        })
    }

    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        self.op == OpCode::Dispatch
    }

    /// Event type, or "" for non-dispatch frames
    #[must_use]
    pub fn event_type(&self) -> &str {
        self.t.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GatewayMessage(op={}", self.op)?;
        if let Some(t) = &self.t {
            write!(f, ", t={t}")?;
        }
        if let Some(s) = self.s {
            write!(f, ", s={s}")?;
        }
        write!(f, ")")
    }
}
