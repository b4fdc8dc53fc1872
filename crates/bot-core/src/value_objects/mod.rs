//! Value objects - immutable types that represent domain concepts

mod intents;
mod token;

pub use intents::Intents;
pub use token::{Token, TokenType};
