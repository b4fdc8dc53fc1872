//! Bot gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p bot-gateway
//! ```
//!
//! Configuration is loaded from environment variables (see `BotConfig`).

use std::sync::Arc;

use bot_common::{try_init_tracing_with_config, AppError, AppResult, BotConfig, TracingConfig};
use bot_core::OpenApi;
use bot_gateway::{
    run_forever, ClientConfig, EventHandler, GreetingHandler, RunnerOptions, Session, ShardConfig,
};
use bot_openapi::{HttpOpenApi, OpenApiConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, code = e.error_code(), "Bot gateway stopped");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = BotConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }
    info!(
        env = ?config.env,
        app_id = config.credentials.app_id,
        sandbox = config.api.sandbox,
        intents = %config.gateway.intents,
        "Configuration loaded"
    );

    let token = config.credentials.bot_token();
    let api = Arc::new(HttpOpenApi::new(
        token.clone(),
        OpenApiConfig {
            sandbox: config.api.sandbox,
            timeout: config.api.timeout(),
            base_url: None,
        },
    )?);

    let endpoint = api.ws_endpoint().await?;
    info!(
        url = %endpoint.url,
        shards = endpoint.shards,
        remaining = endpoint.session_start_limit.remaining,
        "Gateway endpoint resolved"
    );

    let session = Session::new(
        endpoint.url,
        token,
        config.gateway.intents,
        ShardConfig::new(0, endpoint.shards),
    );
    let handler: Arc<dyn EventHandler> = Arc::new(GreetingHandler::new(api));
    let options = RunnerOptions {
        client: ClientConfig {
            queue_size: config.gateway.queue_size,
            provisional_heartbeat: config.gateway.provisional_heartbeat(),
        },
        reconnect_delay: config.gateway.reconnect_delay(),
    };

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
                shutdown.cancel();
            }
        }
    });

    run_forever(session, handler, options, shutdown)
        .await
        .map_err(AppError::gateway)?;

    info!("Bot gateway stopped");
    Ok(())
}
