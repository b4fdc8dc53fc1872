//! Test helpers for integration tests
//!
//! Provides a scripted WebSocket gateway and a mock OpenAPI server, both bound
//! to ephemeral localhost ports.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use bot_gateway::GatewayMessage;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::{frame::coding::CloseCode, CloseFrame};
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// How long `wait_*` helpers poll before failing the test
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// One server-side action, run after the client's handshake frame arrives
#[derive(Debug, Clone)]
pub enum Step {
    Send(GatewayMessage),
    Pause(Duration),
    Close(u16, &'static str),
}

/// What the mock gateway does on one connection
#[derive(Debug, Clone)]
pub struct ConnectionScript {
    pub heartbeat_interval_ms: u64,
    pub steps: Vec<Step>,
}

impl Default for ConnectionScript {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: 45_000,
            steps: Vec::new(),
        }
    }
}

impl ConnectionScript {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_heartbeat_interval(mut self, ms: u64) -> Self {
        self.heartbeat_interval_ms = ms;
        self
    }
}

type FrameLog = Arc<Mutex<Vec<Vec<Value>>>>;

/// Scripted gateway server
///
/// Connection `n` follows `scripts[n]`; connections past the end of the list
/// get a default script that only says Hello. Every text frame a client sends
/// is recorded per connection.
pub struct MockGateway {
    pub addr: SocketAddr,
    frames: FrameLog,
    _handle: JoinHandle<()>,
}

impl MockGateway {
    pub async fn start(scripts: Vec<ConnectionScript>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let frames: FrameLog = Arc::default();

        let log = frames.clone();
        let handle = tokio::spawn(async move {
            while let Ok((tcp, _)) = listener.accept().await {
                let index = {
                    let mut log = log.lock();
                    log.push(Vec::new());
                    log.len() - 1
                };
                let script = scripts.get(index).cloned().unwrap_or_default();
                tokio::spawn(serve_connection(tcp, script, log.clone(), index));
            }
        });

        Ok(Self {
            addr,
            frames,
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("ws://{}/websocket", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.frames.lock().len()
    }

    /// Frames received on connection `index`, in order
    pub fn frames(&self, index: usize) -> Vec<Value> {
        self.frames.lock().get(index).cloned().unwrap_or_default()
    }

    /// The Identify or Resume frame of connection `index`
    pub fn handshake(&self, index: usize) -> Option<Value> {
        self.frames(index).into_iter().next()
    }

    pub async fn wait_for_connections(&self, count: usize) {
        wait_until(|| self.connections() >= count, "gateway connections").await;
    }

    pub async fn wait_for_frames(&self, index: usize, count: usize) {
        wait_until(|| self.frames(index).len() >= count, "client frames").await;
    }
}

async fn serve_connection(tcp: TcpStream, script: ConnectionScript, log: FrameLog, index: usize) {
    let Ok(ws) = tokio_tungstenite::accept_async(tcp).await else {
        return;
    };
    let (mut tx, mut rx) = ws.split();

    let hello = GatewayMessage::hello(script.heartbeat_interval_ms);
    let Ok(text) = hello.to_json() else { return };
    if tx.send(WsMessage::Text(text)).await.is_err() {
        return;
    }

    // Record client frames until the client goes away; steps start once the
    // handshake frame has arrived
    let (handshake_tx, handshake_rx) = tokio::sync::oneshot::channel();
    let reading = tokio::spawn(async move {
        let mut handshake_tx = Some(handshake_tx);
        while let Some(Ok(frame)) = rx.next().await {
            match frame {
                WsMessage::Text(text) => {
                    let value = serde_json::from_str(&text).unwrap_or(Value::Null);
                    log.lock()[index].push(value);
                    if let Some(tx) = handshake_tx.take() {
                        let _ = tx.send(());
                    }
                }
                WsMessage::Close(_) => break,
                _ => {}
            }
        }
    });
    if handshake_rx.await.is_err() {
        return;
    }

    for step in script.steps {
        let sent = match step {
            Step::Send(message) => match message.to_json() {
                Ok(text) => tx.send(WsMessage::Text(text)).await,
                Err(_) => continue,
            },
            Step::Pause(duration) => {
                tokio::time::sleep(duration).await;
                Ok(())
            }
            Step::Close(code, reason) => {
                tx.send(WsMessage::Close(Some(CloseFrame {
                    code: CloseCode::from(code),
                    reason: reason.into(),
                })))
                .await
            }
        };
        if sent.is_err() {
            break;
        }
    }

    let _ = reading.await;
}

/// Messages posted to the mock OpenAPI, as `(channel_id, body)`
type PostLog = Arc<Mutex<Vec<(String, Value)>>>;

#[derive(Clone)]
struct ApiState {
    gateway_url: String,
    posts: PostLog,
}

/// Mock OpenAPI server
pub struct MockOpenApi {
    pub addr: SocketAddr,
    posts: PostLog,
    _handle: JoinHandle<()>,
}

impl MockOpenApi {
    /// Start a server whose `/gateway/bot` points at `gateway_url`
    pub async fn start(gateway_url: impl Into<String>) -> Result<Self> {
        let posts: PostLog = Arc::default();
        let state = ApiState {
            gateway_url: gateway_url.into(),
            posts: posts.clone(),
        };

        let app = Router::new()
            .route("/gateway/bot", get(gateway_bot))
            .route("/channels/:channel_id/messages", post(create_message))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            posts,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().clone()
    }

    pub async fn wait_for_posts(&self, count: usize) {
        wait_until(|| self.posts.lock().len() >= count, "posted messages").await;
    }
}

async fn gateway_bot(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "url": state.gateway_url,
        "shards": 1,
        "session_start_limit": {
            "total": 1000,
            "remaining": 999,
            "reset_after": 86_400_000,
            "max_concurrency": 1
        }
    }))
}

async fn create_message(
    State(state): State<ApiState>,
    Path(channel_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.posts.lock().push((channel_id.clone(), body.clone()));
    Json(json!({
        "id": "reply-1",
        "channel_id": channel_id,
        "content": body["content"],
        "author": {"id": "bot", "username": "bot", "bot": true}
    }))
}

/// Poll `done` until it holds, panicking after [`WAIT_TIMEOUT`]
pub async fn wait_until(done: impl Fn() -> bool, what: &str) {
    let polled = tokio::time::timeout(WAIT_TIMEOUT, async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(polled.is_ok(), "timed out waiting for {what}");
}
