//! # bot-gateway
//!
//! Gateway session engine: connects to the bot gateway, authenticates with
//! Identify or Resume, keeps the connection alive and routes dispatch events
//! to an [`EventHandler`].

pub mod client;
pub mod error;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod runner;
pub mod session;

pub use client::{ClientConfig, GatewayClient, HeartbeatScheduler, ResumeHandle};
pub use error::{CodecError, GatewayError, GatewayResult, ProtocolSignal};
pub use events::{DispatchEvent, EventType, ReadyEvent};
pub use handlers::{EventHandler, GreetingHandler, HandlerError, HandlerResult, NoopHandler};
pub use protocol::{CloseCode, GatewayMessage, OpCode, Payload};
pub use runner::{run_forever, RunnerOptions};
pub use session::{ConnectionState, Session, SessionState, ShardConfig};
