//! Runtime session state shared by the read, dispatch and control activities

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use parking_lot::RwLock;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    /// Socket open, no handshake sent
    Connected = 1,
    /// Identify or Resume written, waiting for the first dispatch
    Authenticating = 2,
    Active = 3,
    /// Terminal
    Closed = 4,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connected,
            2 => Self::Authenticating,
            3 => Self::Active,
            4 => Self::Closed,
            _ => Self::Disconnected,
        }
    }
}

/// Mutable half of a session
///
/// The dispatch loop is the only writer of the sequence; the control loop reads
/// it when building heartbeats.
#[derive(Debug)]
pub struct SessionState {
    last_seq: AtomicU64,
    session_id: RwLock<String>,
    state: AtomicU8,
}

impl SessionState {
    pub fn new(session_id: impl Into<String>, last_seq: u64) -> Self {
        Self {
            last_seq: AtomicU64::new(last_seq),
            session_id: RwLock::new(session_id.into()),
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
        }
    }

    /// Record a dispatch sequence; zero is ignored and the value never moves backwards
    pub fn save_seq(&self, seq: u64) {
        if seq > 0 {
            self.last_seq.fetch_max(seq, Ordering::AcqRel);
        }
    }

    pub fn last_seq(&self) -> u64 {
        self.last_seq.load(Ordering::Acquire)
    }

    pub fn session_id(&self) -> String {
        self.session_id.read().clone()
    }

    pub fn set_session_id(&self, id: impl Into<String>) {
        *self.session_id.write() = id.into();
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move to `next` unless already `Closed`; returns the previous state
    pub fn transition(&self, next: ConnectionState) -> ConnectionState {
        let result = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if current == ConnectionState::Closed as u8 {
                    None
                } else {
                    Some(next as u8)
                }
            });
        ConnectionState::from_u8(result.unwrap_or_else(|closed| closed))
    }

    /// `Authenticating -> Active` on the first dispatch; true when this call made the move
    pub fn activate(&self) -> bool {
        self.state
            .compare_exchange(
                ConnectionState::Authenticating as u8,
                ConnectionState::Active as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Mark `Closed`; true only for the first caller
    pub fn close(&self) -> bool {
        self.state.swap(ConnectionState::Closed as u8, Ordering::AcqRel)
            != ConnectionState::Closed as u8
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(String::new(), 0)
    }
}
