//! Greeting handler - answers "hello" mentions

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{Message, MessageToCreate, OpenApi};

use super::{EventHandler, HandlerError, HandlerResult};
use crate::protocol::GatewayMessage;

pub const DEFAULT_GREETING: &str = "你好，我是机器人。@我并说 hello 就能收到问候。";

const TRIGGERS: [&str; 2] = ["hello", "你好"];

/// Replies to at-messages containing a greeting, mentioning the author
pub struct GreetingHandler<A: OpenApi> {
    api: Arc<A>,
    greeting: String,
}

impl<A: OpenApi> GreetingHandler<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }

    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    fn is_greeting(content: &str) -> bool {
        let lower = content.to_lowercase();
        TRIGGERS.iter().any(|t| lower.contains(t))
    }
}

#[async_trait]
impl<A: OpenApi + 'static> EventHandler for GreetingHandler<A> {
    async fn on_at_message(&self, _envelope: &GatewayMessage, message: &Message) -> HandlerResult<()> {
        if !Self::is_greeting(&message.plain_content()) {
            return Ok(());
        }
        if message.channel_id.is_empty() {
            return Err(HandlerError::Unusable(format!(
                "message {} has no channel to reply in",
                message.id
            )));
        }

        let reply = MessageToCreate::text(self.greeting.clone()).in_reply_to(message.id.clone());
        let sent = self
            .api
            .post_message(&message.channel_id, &message.author.id, reply)
            .await?;

        tracing::debug!(
            channel_id = %message.channel_id,
            reply_id = %sent.id,
            "Greeting sent"
        );
        Ok(())
    }
}
