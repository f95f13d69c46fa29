//! Postmark transport configuration.

use core_config::{env_flag, env_or_default, env_parse, env_required, ConfigError, FromEnv};
use std::time::Duration;

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.postmarkapp.com";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Postmark configuration.
#[derive(Clone)]
pub struct PostmarkConfig {
    /// Server token, sent as `X-Postmark-Server-Token`.
    pub server_token: String,
    /// Emit a redacted summary of every send through the mail logger.
    pub debug: bool,
    /// API base URL (without the `/email` path).
    pub api_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl PostmarkConfig {
    /// Create a configuration for the production endpoint.
    pub fn new(server_token: impl Into<String>) -> Self {
        Self {
            server_token: server_token.into(),
            debug: false,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the single-message endpoint.
    pub fn email_endpoint(&self) -> String {
        format!("{}/email", self.api_url.trim_end_matches('/'))
    }
}

// Keep the token out of Debug output.
impl std::fmt::Debug for PostmarkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostmarkConfig")
            .field("server_token", &"<redacted>")
            .field("debug", &self.debug)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FromEnv for PostmarkConfig {
    /// Reads:
    /// - `POSTMARK_SERVER_TOKEN` (required)
    /// - `POSTMARK_DEBUG` (default false)
    /// - `POSTMARK_API_URL` (default production)
    /// - `POSTMARK_TIMEOUT_SECS` (default 30)
    fn from_env() -> Result<Self, ConfigError> {
        let server_token = env_required("POSTMARK_SERVER_TOKEN")?;
        let timeout_secs = env_parse("POSTMARK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self::new(server_token)
            .with_debug(env_flag("POSTMARK_DEBUG"))
            .with_api_url(env_or_default("POSTMARK_API_URL", DEFAULT_API_URL))
            .with_timeout(Duration::from_secs(timeout_secs)))
    }
}
