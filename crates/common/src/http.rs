//! Outbound HTTP client construction.
//!
//! Every external call (oEmbed lookups, LLM completions) goes through a
//! client built here so that each concern carries its own timeout.

use std::time::Duration;

use reqwest::Client;

use crate::{AppError, AppResult};

/// Outbound HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("reelshelf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

impl HttpClientConfig {
    /// Create settings with the given user agent and timeout.
    #[must_use]
    pub fn new(user_agent: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout_secs,
        }
    }

    /// Build a `reqwest` client from these settings.
    pub fn build(&self) -> AppResult<Client> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.timeout_secs.min(5)))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))
    }
}
