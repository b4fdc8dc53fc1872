//! Gateway session engine
//!
//! One [`GatewayClient`] drives one websocket connection through
//! `Disconnected -> Connected -> Authenticating -> Active -> Closed`. `listen`
//! runs three activities: the read loop and dispatch loop as spawned tasks,
//! and the control loop (heartbeats and teardown signals) on the caller's task.
//! `Closed` is terminal; reconnecting means building a new client from
//! [`GatewayClient::session`].

mod dispatcher;
mod heartbeat;
mod panic_report;
mod reader;
#[cfg(test)]
pub(crate) mod testing;

pub use heartbeat::HeartbeatScheduler;

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_util::sync::CancellationToken;

use crate::error::{GatewayError, GatewayResult};
use crate::handlers::EventHandler;
use crate::protocol::{GatewayMessage, IdentifyPayload, ResumePayload};
use crate::session::{ConnectionState, Session, SessionState};

use dispatcher::{Dispatcher, Router};
use reader::Reader;

pub(crate) type WsSink = Pin<Box<dyn Sink<WsMessage, Error = WsError> + Send>>;
pub(crate) type WsStream = Pin<Box<dyn Stream<Item = Result<WsMessage, WsError>> + Send>>;

/// Capacity of the fatal-signal channel
const FATAL_SIGNAL_CAPACITY: usize = 10;

/// How long `close` lets the dispatch loop drain already queued events
const DISPATCH_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Engine tuning
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Event queue capacity between the read and dispatch loops
    pub queue_size: usize,
    /// Heartbeat period used until the server's Hello
    pub provisional_heartbeat: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            queue_size: 10_000,
            provisional_heartbeat: Duration::from_secs(60),
        }
    }
}

/// Asks a listening client to stop so the caller can Resume
#[derive(Debug, Clone)]
pub struct ResumeHandle(Arc<Notify>);

impl ResumeHandle {
    /// Request a reconnect; `listen` returns [`GatewayError::NeedReconnect`]
    pub fn request(&self) {
        self.0.notify_one();
    }
}

pub struct GatewayClient {
    session: Session,
    state: Arc<SessionState>,
    handler: Arc<dyn EventHandler>,
    config: ClientConfig,
    sink: Option<WsSink>,
    stream: Option<WsStream>,
    reader: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    resume: Arc<Notify>,
    label: String,
}

impl GatewayClient {
    pub fn new(session: Session, handler: Arc<dyn EventHandler>) -> Self {
        let state = Arc::new(SessionState::new(session.id.clone(), session.last_seq));
        let label = session.to_string();
        Self {
            session,
            state,
            handler,
            config: ClientConfig::default(),
            sink: None,
            stream: None,
            reader: None,
            dispatcher: None,
            shutdown: CancellationToken::new(),
            resume: Arc::new(Notify::new()),
            label,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Tie this client's shutdown to `parent`; cancelling the client does not cancel the parent
    #[must_use]
    pub fn with_shutdown(mut self, parent: &CancellationToken) -> Self {
        self.shutdown = parent.child_token();
        self
    }

    /// Cancelling this token makes `listen` return `Ok(())`
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn resume_handle(&self) -> ResumeHandle {
        ResumeHandle(self.resume.clone())
    }

    pub fn state(&self) -> ConnectionState {
        self.state.state()
    }

    /// Descriptor for the next attempt: session id from READY and the last sequence
    pub fn session(&self) -> Session {
        Session {
            id: self.state.session_id(),
            last_seq: self.state.last_seq(),
            ..self.session.clone()
        }
    }

    /// Dial the session URL
    pub async fn connect(&mut self) -> GatewayResult<()> {
        self.ensure_open()?;
        if self.session.url.is_empty() {
            return Err(GatewayError::Dial("gateway url is empty".to_string()));
        }

        let (socket, _response) = tokio_tungstenite::connect_async(self.session.url.as_str())
            .await
            .map_err(|e| {
                tracing::warn!(session = %self.label, url = %self.session.url, error = %e, "Dial failed");
                GatewayError::Dial(e.to_string())
            })?;

        let (sink, stream) = socket.split();
        self.attach(sink, stream)?;
        tracing::info!(session = %self.label, url = %self.session.url, "Connected");
        Ok(())
    }

    /// Install an already established transport
    pub fn attach<S, R>(&mut self, sink: S, stream: R) -> GatewayResult<()>
    where
        S: Sink<WsMessage, Error = WsError> + Send + 'static,
        R: Stream<Item = Result<WsMessage, WsError>> + Send + 'static,
    {
        self.ensure_open()?;
        self.sink = Some(Box::pin(sink));
        self.stream = Some(Box::pin(stream));
        self.state.transition(ConnectionState::Connected);
        Ok(())
    }

    /// The frame `authenticate` would write: Resume with a session id, Identify without
    pub fn handshake_message(&self) -> GatewayMessage {
        let session_id = self.state.session_id();
        if session_id.is_empty() {
            GatewayMessage::identify(&self.identify_payload())
        } else {
            GatewayMessage::resume(&ResumePayload {
                token: self.session.token.auth_value(),
                session_id,
                seq: self.state.last_seq(),
            })
        }
    }

    fn identify_payload(&self) -> IdentifyPayload {
        IdentifyPayload::new(
            self.session.token.auth_value(),
            self.session.intents,
            self.session.shards.shard_id,
            self.session.shards.shard_count,
        )
    }

    /// Identify or Resume depending on whether a session id is known
    pub async fn authenticate(&mut self) -> GatewayResult<()> {
        let message = self.handshake_message();
        self.send_handshake(message).await
    }

    pub async fn identify(&mut self) -> GatewayResult<()> {
        let message = GatewayMessage::identify(&self.identify_payload());
        self.send_handshake(message).await
    }

    pub async fn resume(&mut self) -> GatewayResult<()> {
        let message = GatewayMessage::resume(&ResumePayload {
            token: self.session.token.auth_value(),
            session_id: self.state.session_id(),
            seq: self.state.last_seq(),
        });
        self.send_handshake(message).await
    }

    async fn send_handshake(&mut self, message: GatewayMessage) -> GatewayResult<()> {
        self.ensure_open()?;
        self.write(&message).await?;
        self.state.transition(ConnectionState::Authenticating);
        tracing::info!(session = %self.label, op = %message.op, "Handshake sent");
        Ok(())
    }

    /// Write one frame
    pub async fn write(&mut self, message: &GatewayMessage) -> GatewayResult<()> {
        let json = message.to_json()?;
        let sink = self.sink.as_mut().ok_or(GatewayError::NotConnected)?;
        sink.send(WsMessage::Text(json))
            .await
            .map_err(|e| GatewayError::WriteFailure(e.to_string()))?;
        tracing::trace!(session = %self.label, op = %message.op, "Frame written");
        Ok(())
    }

    /// Run the connection until it closes
    ///
    /// Returns `Ok(())` only when the shutdown token is cancelled. Every exit
    /// path closes the client.
    pub async fn listen(&mut self) -> GatewayResult<()> {
        let result = self.run_activities().await;
        if let Err(e) = &result {
            tracing::warn!(session = %self.label, error = %e, "Connection terminated");
        }
        self.close().await;
        result
    }

    async fn run_activities(&mut self) -> GatewayResult<()> {
        self.ensure_open()?;
        if self.sink.is_none() {
            return Err(GatewayError::NotConnected);
        }
        let stream = self.stream.take().ok_or(GatewayError::NotConnected)?;

        let (queue_tx, queue_rx) = mpsc::channel(self.config.queue_size.max(1));
        let (fatal_tx, mut fatal_rx) = mpsc::channel(FATAL_SIGNAL_CAPACITY);
        let (period_tx, mut period_rx) = watch::channel(self.config.provisional_heartbeat);

        let reader = Reader {
            stream,
            queue: queue_tx,
            fatal: fatal_tx.clone(),
            heartbeat: period_tx,
            cancel: self.shutdown.clone(),
            label: self.label.clone(),
        };
        let dispatcher = Dispatcher {
            queue: queue_rx,
            router: Router {
                state: self.state.clone(),
                handler: self.handler.clone(),
                label: self.label.clone(),
            },
            fatal: fatal_tx,
        };
        self.reader = Some(tokio::spawn(reader.run()));
        self.dispatcher = Some(tokio::spawn(dispatcher.run()));

        let shutdown = self.shutdown.clone();
        let resume = self.resume.clone();
        let mut heartbeat = HeartbeatScheduler::new(*period_rx.borrow_and_update());
        let mut period_open = true;

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    tracing::info!(session = %self.label, "Shutdown requested");
                    return Ok(());
                }
                () = resume.notified() => return Err(GatewayError::NeedReconnect),
                Some(err) = fatal_rx.recv() => return Err(err),
                changed = period_rx.changed(), if period_open => {
                    if changed.is_ok() {
                        let period = *period_rx.borrow_and_update();
                        heartbeat.reset(period);
                        tracing::debug!(session = %self.label, period_ms = period.as_millis() as u64, "Heartbeat period updated");
                    } else {
                        period_open = false;
                    }
                }
                _ = heartbeat.tick() => {
                    let seq = self.state.last_seq();
                    self.write(&GatewayMessage::heartbeat((seq > 0).then_some(seq))).await?;
                    tracing::debug!(session = %self.label, seq, "Heartbeat sent");
                }
            }
        }
    }

    /// Tear the connection down; later calls are no-ops
    ///
    /// Stops the read loop, then gives the dispatch loop a bounded grace period
    /// to finish events that were already queued.
    pub async fn close(&mut self) {
        self.shutdown.cancel();

        if let Some(reader) = self.reader.take() {
            if let Err(e) = reader.await {
                tracing::error!(session = %self.label, error = %e, "Read task failed");
            }
        }
        if let Some(mut dispatcher) = self.dispatcher.take() {
            match tokio::time::timeout(DISPATCH_DRAIN_GRACE, &mut dispatcher).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(session = %self.label, error = %e, "Dispatch task failed"),
                Err(_) => {
                    tracing::warn!(session = %self.label, "Dispatch loop did not drain in time, aborting");
                    dispatcher.abort();
                }
            }
        }
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close().await {
                tracing::debug!(session = %self.label, error = %e, "Socket close failed");
            }
        }
        self.stream = None;

        if self.state.close() {
            tracing::info!(
                session = %self.label,
                last_seq = self.state.last_seq(),
                "Connection closed"
            );
        }
    }

    fn ensure_open(&self) -> GatewayResult<()> {
        if self.state.state() == ConnectionState::Closed {
            Err(GatewayError::Closed)
        } else {
            Ok(())
        }
    }
}
