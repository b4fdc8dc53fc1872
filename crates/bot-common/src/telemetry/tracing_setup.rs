//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set. Otherwise the filter is built from the configured
//! level plus per-target directives, which by default keep the websocket and
//! HTTP stacks at `warn` so frame-level gateway logs stay readable.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::Environment;

/// Targets that are noisy at debug level while the gateway is running
const QUIET_TARGETS: [&str; 4] = ["tungstenite", "tokio_tungstenite", "hyper", "reqwest"];

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for targets without a directive
    pub level: Level,
    pub format: LogFormat,
    /// Emit span open/close events
    pub span_events: bool,
    /// Include file and line of the call site
    pub source_location: bool,
    pub thread_names: bool,
    /// Extra `target=level` directives appended to the filter
    pub directives: Vec<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            span_events: false,
            source_location: false,
            thread_names: false,
            directives: quiet_directives(),
        }
    }
}

impl TracingConfig {
    /// Debug level for the bot crates, pretty output with call sites
    #[must_use]
    pub fn development() -> Self {
        let mut directives = quiet_directives();
        directives.push("bot_gateway=debug".to_string());
        directives.push("bot_openapi=debug".to_string());
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            span_events: true,
            source_location: true,
            thread_names: true,
            directives,
        }
    }

    /// JSON output at info level
    #[must_use]
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            ..Self::default()
        }
    }

    /// Preset for a deployment environment
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Staging => Self::default(),
            Environment::Production => Self::production(),
        }
    }

    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Filter string used when `RUST_LOG` is unset, e.g. `info,hyper=warn`
    pub fn filter_spec(&self) -> String {
        std::iter::once(self.level.as_str().to_lowercase())
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.filter_spec()))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_thread_names(self.thread_names)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Json => layer.json().boxed(),
        }
    }
}

fn quiet_directives() -> Vec<String> {
    QUIET_TARGETS.iter().map(|target| format!("{target}=warn")).collect()
}

/// Install the global subscriber with the default configuration
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::default())
}

/// Install the global subscriber; fails if one is already installed
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
