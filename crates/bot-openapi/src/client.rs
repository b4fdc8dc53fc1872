//! HTTP OpenAPI client

use std::time::Instant;

use async_trait::async_trait;
use bot_core::{ApiError, ApiResult, GatewayEndpoint, Message, MessageToCreate, OpenApi, Token};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::OpenApiConfig;

/// Response header carrying the platform's request trace id
pub const TRACE_ID_HEADER: &str = "X-Tps-trace-ID";

/// reqwest implementation of [`OpenApi`]
#[derive(Debug, Clone)]
pub struct HttpOpenApi {
    http: Client,
    token: Token,
    base_url: String,
}

struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl HttpOpenApi {
    pub fn new(token: Token, config: OpenApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            token,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, self.token.auth_value())
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> ApiResult<RawResponse> {
        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_vec();

        tracing::debug!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            trace_id = %trace_id,
            "OpenAPI request"
        );

        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
                trace_id,
            });
        }

        Ok(RawResponse { status, body })
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl OpenApi for HttpOpenApi {
    async fn ws_endpoint(&self) -> ApiResult<GatewayEndpoint> {
        let path = "/gateway/bot";
        let response = self.send(Method::GET, path, self.request(Method::GET, path)).await?;
        let endpoint: GatewayEndpoint = decode(&response.body)?;

        if endpoint.url.is_empty() {
            return Err(ApiError::Decode("gateway url is empty".to_string()));
        }
        Ok(endpoint)
    }

    async fn post_message(
        &self,
        channel_id: &str,
        reply_to_user_id: &str,
        mut message: MessageToCreate,
    ) -> ApiResult<Message> {
        if channel_id.is_empty() {
            return Err(ApiError::InvalidRequest("channel id is empty".to_string()));
        }
        if !reply_to_user_id.is_empty() {
            message.content = format!("<@{}>{}", reply_to_user_id, message.content);
        }

        let path = format!("/channels/{channel_id}/messages");
        let request = self.request(Method::POST, &path).json(&message);
        let response = self.send(Method::POST, &path, request).await?;

        if response.status == StatusCode::NO_CONTENT || response.body.is_empty() {
            return Ok(Message {
                channel_id: channel_id.to_string(),
                content: message.content,
                ..Message::default()
            });
        }
        decode(&response.body)
    }
}
