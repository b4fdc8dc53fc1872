//! Gateway error types
//!
//! Per-frame codec errors are recoverable; every [`GatewayError`] returned from
//! the client is terminal for that connection.

use std::fmt;

use thiserror::Error;

use crate::protocol::CloseCode;

/// Frame encode/decode errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Frame is not a valid envelope (bad JSON, missing or unknown op)
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Envelope is fine but `d` does not have the expected shape
    #[error("Payload decode error: {0}")]
    PayloadDecode(String),
}

/// Server-initiated teardown requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolSignal {
    /// Op 7
    Reconnect,
    /// Op 9
    InvalidSession,
}

impl fmt::Display for ProtocolSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconnect => write!(f, "need reconnect"),
            Self::InvalidSession => write!(f, "invalid session"),
        }
    }
}

/// Terminal connection errors
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Could not establish the websocket (empty url, DNS, TCP, TLS, handshake)
    #[error("Dial error: {0}")]
    Dial(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Write failure: {0}")]
    WriteFailure(String),

    #[error("Read failure: {0}")]
    ReadFailure(String),

    /// Server sent a websocket close frame
    #[error("Connection closed (code {code:?}): {reason}")]
    ConnectionClosed { code: Option<u16>, reason: String },

    #[error("Protocol signal: {0}")]
    ProtocolSignal(ProtocolSignal),

    /// Event handler panicked
    #[error("Handler fault: {0}")]
    HandlerFault(String),

    /// Caller asked the connection to stop so it can be resumed
    #[error("Need reconnect")]
    NeedReconnect,

    #[error("Not connected")]
    NotConnected,

    #[error("Client is closed")]
    Closed,
}

impl GatewayError {
    /// Whether a new connection attempt is worthwhile at all
    pub fn can_reconnect(&self) -> bool {
        match self {
            Self::ConnectionClosed { code: Some(code), .. } => {
                CloseCode::from_u16(*code).map_or(true, CloseCode::can_reconnect)
            }
            _ => true,
        }
    }

    /// Whether the next attempt may Resume with the current session id and sequence
    pub fn can_resume(&self) -> bool {
        match self {
            Self::ProtocolSignal(ProtocolSignal::InvalidSession) => false,
            Self::ConnectionClosed { code: Some(code), .. } => {
                CloseCode::from_u16(*code).map_or(true, CloseCode::can_resume)
            }
            _ => true,
        }
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
