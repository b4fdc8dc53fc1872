//! OpenAPI port
//!
//! The gateway engine and business handlers depend on this trait, not on the
//! HTTP client that implements it.

use async_trait::async_trait;

use crate::entities::{GatewayEndpoint, Message, MessageToCreate};
use crate::error::ApiResult;

#[async_trait]
pub trait OpenApi: Send + Sync {
    /// Fetch the websocket access point and recommended shard count
    async fn ws_endpoint(&self) -> ApiResult<GatewayEndpoint>;

    /// Post a message to a channel
    ///
    /// A non-empty `reply_to_user_id` mentions that user at the start of the content.
    async fn post_message(
        &self,
        channel_id: &str,
        reply_to_user_id: &str,
        message: MessageToCreate,
    ) -> ApiResult<Message>;
}
