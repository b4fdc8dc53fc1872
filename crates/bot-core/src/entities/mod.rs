//! Domain entities - objects exchanged with the bot platform

mod gateway;
mod message;
mod user;

pub use gateway::{GatewayEndpoint, SessionStartLimit};
pub use message::{Message, MessageToCreate};
pub use user::{Member, User};
