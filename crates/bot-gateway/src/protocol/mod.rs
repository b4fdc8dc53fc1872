//! Gateway wire protocol
//!
//! Op codes, close codes, the frame envelope and its payloads.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::{GatewayMessage, Payload};
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties, ResumePayload};
