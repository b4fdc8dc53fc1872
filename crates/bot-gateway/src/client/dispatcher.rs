//! Dispatch loop
//!
//! Drains the event queue in order until the read loop closes it, records
//! sequence numbers and routes events to the [`EventHandler`]. A handler panic
//! is caught here and turned into a [`GatewayError::HandlerFault`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use super::panic_report::{self, CapturePanics, PanicReport};
use crate::error::GatewayError;
use crate::events::DispatchEvent;
use crate::handlers::EventHandler;
use crate::protocol::{GatewayMessage, Payload};
use crate::session::SessionState;

pub(crate) struct Dispatcher {
    pub queue: mpsc::Receiver<GatewayMessage>,
    pub router: Router,
    pub fatal: mpsc::Sender<GatewayError>,
}

pub(crate) struct Router {
    pub state: Arc<SessionState>,
    pub handler: Arc<dyn EventHandler>,
    pub label: String,
}

impl Dispatcher {
    pub async fn run(mut self) {
        panic_report::install_hook();
        while let Some(message) = self.queue.recv().await {
            if let Some(seq) = message.s {
                self.router.state.save_seq(seq);
            }
            if message.is_dispatch() && self.router.state.activate() {
                tracing::info!(session = %self.router.label, "Session active");
            }

            let outcome = AssertUnwindSafe(CapturePanics::new(self.router.route(&message)))
                .catch_unwind()
                .await;
            if let Err(panic) = outcome {
                let report = PanicReport::take(panic.as_ref());
                tracing::error!(
                    session = %self.router.label,
                    event = message.event_type(),
                    seq = ?message.s,
                    panic = %report.message,
                    location = report.location(),
                    backtrace = %report.backtrace_text(),
                    "Event handler panicked"
                );
                let _ = self.fatal.send(GatewayError::HandlerFault(report.message)).await;
                break;
            }
        }
    }
}

impl Router {
    async fn route(&self, message: &GatewayMessage) {
        let event = match message.payload() {
            Ok(Payload::Dispatch(event)) => event,
            Ok(_) => {
                tracing::debug!(session = %self.label, op = %message.op, "Ignoring non-dispatch frame");
                return;
            }
            Err(e) => {
                tracing::warn!(session = %self.label, event = message.event_type(), error = %e, "Discarding undecodable event");
                return;
            }
        };

        let result = match &event {
            DispatchEvent::Ready(ready) => {
                self.state.set_session_id(ready.session_id.clone());
                tracing::info!(
                    session = %self.label,
                    session_id = %ready.session_id,
                    user = %ready.user.username,
                    "Ready"
                );
                Ok(())
            }
            DispatchEvent::Resumed => {
                tracing::info!(session = %self.label, "Session resumed");
                Ok(())
            }
            DispatchEvent::AtMessageCreate(m) => self.handler.on_at_message(message, m).await,
            DispatchEvent::MessageCreate(m) => self.handler.on_message_create(message, m).await,
            DispatchEvent::DirectMessageCreate(m) => {
                self.handler.on_direct_message_create(message, m).await
            }
            DispatchEvent::Other(name) => {
                tracing::trace!(session = %self.label, event = %name, "No handler for event");
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(
                session = %self.label,
                event = event.name(),
                kind = e.kind(),
                error = %e,
                "Event handler failed"
            );
        }
    }
}
