//! Gateway operation codes
//!
//! On the wire an op code is a bare integer. Values outside the table below
//! decode as [`OpCode::Unknown`]; the read loop forwards them like any other
//! frame and the dispatch loop ignores them.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OpCode {
    /// Event pushed by the server
    Dispatch,
    /// Keepalive carrying the last sequence
    Heartbeat,
    Identify,
    Resume,
    /// Server wants the client to reconnect and Resume
    Reconnect,
    /// Identify or Resume rejected
    InvalidSession,
    /// First frame on a connection, carries the heartbeat interval
    Hello,
    HeartbeatAck,
    HttpCallbackAck,
    /// A value this client does not know
    Unknown(u8),
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            6 => Self::Resume,
            7 => Self::Reconnect,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            12 => Self::HttpCallbackAck,
            other => Self::Unknown(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Identify => 2,
            OpCode::Resume => 6,
            OpCode::Reconnect => 7,
            OpCode::InvalidSession => 9,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
            OpCode::HttpCallbackAck => 12,
            OpCode::Unknown(value) => value,
        }
    }
}

impl OpCode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "Dispatch",
            Self::Heartbeat => "Heartbeat",
            Self::Identify => "Identify",
            Self::Resume => "Resume",
            Self::Reconnect => "Reconnect",
            Self::InvalidSession => "InvalidSession",
            Self::Hello => "Hello",
            Self::HeartbeatAck => "HeartbeatAck",
            Self::HttpCallbackAck => "HttpCallbackAck",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Label for any raw value; "unknown" outside the table
    #[must_use]
    pub fn describe(value: u8) -> &'static str {
        Self::from(value).name()
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), u8::from(*self))
    }
}
