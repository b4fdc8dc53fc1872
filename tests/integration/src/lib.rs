//! Integration tests for the gateway session engine
//!
//! Drives real WebSocket connections against a scripted mock gateway and a
//! mock OpenAPI server.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
