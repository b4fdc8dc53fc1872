//! Reconnect runner
//!
//! Caller-side loop around [`GatewayClient`]: one client per attempt, Resume
//! when the last error allows it, a fixed delay between attempts.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{ClientConfig, GatewayClient};
use crate::error::GatewayResult;
use crate::handlers::EventHandler;
use crate::session::{ConnectionState, Session};

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    pub client: ClientConfig,
    /// Wait between attempts
    pub reconnect_delay: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// Keep a session connected until `shutdown` is cancelled
///
/// Returns `Ok(())` on shutdown, or the first error after which reconnecting
/// cannot succeed (for example close code 4914).
pub async fn run_forever(
    mut session: Session,
    handler: Arc<dyn EventHandler>,
    options: RunnerOptions,
    shutdown: CancellationToken,
) -> GatewayResult<()> {
    let mut attempt: u64 = 0;

    loop {
        if shutdown.is_cancelled() {
            return Ok(());
        }
        attempt += 1;

        let mut client = GatewayClient::new(session.clone(), handler.clone())
            .with_config(options.client.clone())
            .with_shutdown(&shutdown);

        tracing::info!(
            attempt,
            resume = session.can_resume(),
            last_seq = session.last_seq,
            "Starting gateway session"
        );

        let outcome = tokio::select! {
            outcome = run_attempt(&mut client) => outcome,
            () = shutdown.cancelled() => Ok(()),
        };
        if client.state() != ConnectionState::Closed {
            client.close().await;
        }
        session = client.session();

        let err = match outcome {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        if !err.can_reconnect() {
            tracing::error!(attempt, error = %err, "Gateway session cannot be re-established");
            return Err(err);
        }
        if !err.can_resume() {
            session.reset();
        }

        tracing::warn!(
            attempt,
            error = %err,
            resume = session.can_resume(),
            delay_ms = options.reconnect_delay.as_millis() as u64,
            "Gateway session ended, reconnecting"
        );

        tokio::select! {
            () = shutdown.cancelled() => return Ok(()),
            () = tokio::time::sleep(options.reconnect_delay) => {}
        }
    }
}

async fn run_attempt(client: &mut GatewayClient) -> GatewayResult<()> {
    client.connect().await?;
    client.authenticate().await?;
    client.listen().await
}
