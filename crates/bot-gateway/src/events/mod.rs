//! Gateway dispatch events

mod event_types;
mod payloads;

pub use event_types::EventType;
pub use payloads::{DispatchEvent, ReadyEvent};
