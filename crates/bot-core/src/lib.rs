//! # bot-core
//!
//! Domain layer containing the bot's entities, value objects, and the port
//! through which the gateway engine talks to the REST OpenAPI.
//! This crate has zero dependencies on infrastructure (HTTP client, websocket, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{GatewayEndpoint, Member, Message, MessageToCreate, SessionStartLimit, User};
pub use error::{ApiError, ApiResult};
pub use traits::OpenApi;
pub use value_objects::{Intents, Token, TokenType};
