//! Backend configuration.
//!
//! The base URL comes from an external [`ConfigSource`]; everything else about
//! the client (timeout, no retry) is fixed.

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "PORTANA_API_URL";

/// Per-request timeout applied to every call made through the client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(8000);

/// Supplies the backend base URL.
///
/// Reads must be synchronous and available before the first service call.
pub trait ConfigSource: Send + Sync {
    fn api_url(&self) -> Option<String>;
}

/// Reads the base URL from `PORTANA_API_URL`, loading a `.env` file first.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn api_url(&self) -> Option<String> {
        dotenvy::dotenv().ok();
        std::env::var(API_URL_ENV).ok()
    }
}

/// A fixed base URL, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticConfig {
    api_url: Option<String>,
}

impl StaticConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: Some(api_url.into()),
        }
    }

    /// A source that has no base URL at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ConfigSource for StaticConfig {
    fn api_url(&self) -> Option<String> {
        self.api_url.clone()
    }
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    request_timeout: Duration,
}

impl ApiConfig {
    /// Validate a base URL and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the URL is blank, unparsable, or not
    /// an `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::config(format!("{} is empty", API_URL_ENV)));
        }

        let parsed = Url::parse(trimmed)
            .map_err(|e| ApiError::config(format!("Invalid API URL '{}': {}", trimmed, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "Unsupported API URL scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    /// Resolve the configuration from a source.
    pub fn resolve(source: &dyn ConfigSource) -> Result<Self> {
        let url = source
            .api_url()
            .ok_or_else(|| ApiError::config(format!("{} is not set", API_URL_ENV)))?;
        Self::new(&url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[cfg(test)]
    pub(crate) fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
