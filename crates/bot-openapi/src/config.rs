//! OpenAPI client configuration

use std::time::Duration;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.sgroup.qq.com";

/// Sandbox API host
pub const SANDBOX_BASE_URL: &str = "https://sandbox.api.sgroup.qq.com";

#[derive(Debug, Clone)]
pub struct OpenApiConfig {
    /// Route requests to the sandbox environment
    pub sandbox: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Explicit base URL, overriding `sandbox` (local mocks)
    pub base_url: Option<String>,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            sandbox: false,
            timeout: Duration::from_secs(3),
            base_url: None,
        }
    }
}

impl OpenApiConfig {
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            sandbox: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolved base URL without a trailing slash
    pub fn base_url(&self) -> String {
        let base = match &self.base_url {
            Some(url) => url.as_str(),
            None if self.sandbox => SANDBOX_BASE_URL,
            None => DEFAULT_BASE_URL,
        };
        base.trim_end_matches('/').to_string()
    }
}
