//! Read loop
//!
//! Pulls frames off the socket, handles protocol-internal op codes and queues
//! everything else for the dispatch loop.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;

use super::WsStream;
use crate::error::{GatewayError, ProtocolSignal};
use crate::protocol::{GatewayMessage, HelloPayload, OpCode};

pub(crate) struct Reader {
    pub stream: WsStream,
    pub queue: mpsc::Sender<GatewayMessage>,
    pub fatal: mpsc::Sender<GatewayError>,
    pub heartbeat: watch::Sender<Duration>,
    pub cancel: CancellationToken,
    pub label: String,
}

impl Reader {
    pub async fn run(mut self) {
        let Some(err) = self.read_frames().await else {
            return;
        };

        // Close the queue first so the dispatch loop drains and stops
        let Self { queue, fatal, label, .. } = self;
        drop(queue);
        tracing::debug!(session = %label, error = %err, "Read loop stopped");
        let _ = fatal.send(err).await;
    }

    /// Returns the terminal error, or `None` when cancelled
    async fn read_frames(&mut self) -> Option<GatewayError> {
        loop {
            let next = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return None,
                next = self.stream.next() => next,
            };

            let bytes = match next {
                Some(Ok(WsMessage::Text(text))) => text.into_bytes(),
                Some(Ok(WsMessage::Binary(data))) => data,
                Some(Ok(WsMessage::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (Some(u16::from(f.code)), f.reason.into_owned()))
                        .unwrap_or_default();
                    tracing::info!(session = %self.label, code = ?code, reason = %reason, "Server closed connection");
                    return Some(GatewayError::ConnectionClosed { code, reason });
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Some(GatewayError::ReadFailure(e.to_string())),
                None => return Some(GatewayError::ReadFailure("stream ended".to_string())),
            };

            let message = match GatewayMessage::from_slice(&bytes) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(session = %self.label, error = %e, "Discarding undecodable frame");
                    continue;
                }
            };
            tracing::debug!(session = %self.label, op = %message.op, t = message.event_type(), "Frame received");

            match message.op {
                OpCode::Hello => self.apply_hello(&message),
                OpCode::HeartbeatAck => {}
                OpCode::Reconnect => {
                    tracing::info!(session = %self.label, "Server requested reconnect");
                    return Some(GatewayError::ProtocolSignal(ProtocolSignal::Reconnect));
                }
                OpCode::InvalidSession => {
                    tracing::warn!(session = %self.label, "Session rejected by server");
                    return Some(GatewayError::ProtocolSignal(ProtocolSignal::InvalidSession));
                }
                _ => {
                    // Blocks while the queue is full
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => return None,
                        sent = self.queue.send(message) => {
                            if sent.is_err() {
                                return None;
                            }
                        }
                    }
                }
            }
        }
    }

    fn apply_hello(&self, message: &GatewayMessage) {
        match message.data::<HelloPayload>() {
            Ok(hello) if hello.heartbeat_interval > 0 => {
                let period = Duration::from_millis(hello.heartbeat_interval);
                self.heartbeat.send_replace(period);
                tracing::info!(
                    session = %self.label,
                    heartbeat_ms = hello.heartbeat_interval,
                    "Hello received"
                );
            }
            Ok(_) => tracing::warn!(session = %self.label, "Ignoring Hello with zero heartbeat interval"),
            Err(e) => tracing::warn!(session = %self.label, error = %e, "Malformed Hello"),
        }
    }
}
