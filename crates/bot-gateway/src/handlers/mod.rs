//! Business event handlers
//!
//! The engine holds one [`EventHandler`] per client, injected at construction.

mod error;
mod greeting;

pub use error::{HandlerError, HandlerResult};
pub use greeting::{GreetingHandler, DEFAULT_GREETING};

use async_trait::async_trait;
use bot_core::Message;

use crate::protocol::GatewayMessage;

/// Callbacks for decoded dispatch events
///
/// Every method defaults to a no-op. READY and RESUMED are consumed by the
/// engine and never reach a handler. Returned errors are logged by the
/// dispatch loop; a panic closes the connection.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// A guild message that @-mentions the bot
    async fn on_at_message(&self, _envelope: &GatewayMessage, _message: &Message) -> HandlerResult<()> {
        Ok(())
    }

    async fn on_message_create(
        &self,
        _envelope: &GatewayMessage,
        _message: &Message,
    ) -> HandlerResult<()> {
        Ok(())
    }

    async fn on_direct_message_create(
        &self,
        _envelope: &GatewayMessage,
        _message: &Message,
    ) -> HandlerResult<()> {
        Ok(())
    }
}

/// Handler that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl EventHandler for NoopHandler {}
