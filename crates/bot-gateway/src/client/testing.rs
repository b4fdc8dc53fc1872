//! In-memory transport and handlers for engine tests

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use bot_core::Message;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::Sink;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};

use crate::handlers::{EventHandler, HandlerError, HandlerResult};
use crate::protocol::GatewayMessage;

/// Sink that records every text frame with the time it was written
#[derive(Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<(Instant, Value)>>>,
    closes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn frames(&self) -> Vec<Value> {
        self.frames.lock().iter().map(|(_, v)| v.clone()).collect()
    }

    /// Write times of frames with the given op
    pub fn times_of(&self, op: u64) -> Vec<Instant> {
        self.frames
            .lock()
            .iter()
            .filter(|(_, v)| v["op"] == op)
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

impl Sink<WsMessage> for RecordingSink {
    type Error = WsError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Poll::Ready(Err(WsError::ConnectionClosed))
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn start_send(self: Pin<&mut Self>, item: WsMessage) -> Result<(), WsError> {
        if let WsMessage::Text(text) = item {
            let value: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            self.frames.lock().push((Instant::now(), value));
        }
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

/// Server side of an in-memory socket
pub struct ScriptedServer {
    tx: UnboundedSender<Result<WsMessage, WsError>>,
}

impl ScriptedServer {
    pub fn new() -> (Self, UnboundedReceiver<Result<WsMessage, WsError>>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    pub fn send(&self, message: &GatewayMessage) {
        self.send_raw(&message.to_json().unwrap());
    }

    pub fn send_raw(&self, text: &str) {
        self.tx.unbounded_send(Ok(WsMessage::Text(text.to_string()))).unwrap();
    }

    pub fn send_frame(&self, frame: WsMessage) {
        self.tx.unbounded_send(Ok(frame)).unwrap();
    }

    pub fn fail(&self) {
        self.tx
            .unbounded_send(Err(WsError::ConnectionClosed))
            .unwrap();
    }
}

pub fn at_message(seq: u64, content: &str) -> GatewayMessage {
    GatewayMessage::dispatch(
        "AT_MESSAGE_CREATE",
        seq,
        &json!({
            "id": format!("m-{seq}"),
            "channel_id": "c-1",
            "content": content,
            "author": {"id": "u-1", "username": "alice"}
        }),
    )
}

pub fn ready(session_id: &str, seq: u64) -> GatewayMessage {
    GatewayMessage::dispatch(
        "READY",
        seq,
        &json!({
            "version": 1,
            "session_id": session_id,
            "user": {"id": "bot", "username": "bot", "bot": true},
            "shard": [0, 1]
        }),
    )
}

/// Handler recording `(seq, content)` of every at-message; panics on content "panic"
#[derive(Default)]
pub struct RecordingHandler {
    seen: Mutex<Vec<(Option<u64>, String)>>,
}

impl RecordingHandler {
    pub fn seen(&self) -> Vec<(Option<u64>, String)> {
        self.seen.lock().clone()
    }

    pub async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.seen.lock().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("handler did not see enough events");
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn on_at_message(&self, envelope: &GatewayMessage, message: &Message) -> HandlerResult<()> {
        self.seen.lock().push((envelope.s, message.content.clone()));
        match message.content.as_str() {
            "panic" => panic!("handler exploded"),
            "error" => Err(HandlerError::business("rejected")),
            _ => Ok(()),
        }
    }
}
