//!
//! ```rust,ignore
//! let gateway = Gateway::builder()
//!     .base_url("http://localhost:8080/api")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! ```
use std::time::Duration;

use log::debug;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::config::{GatewayClientConfiguration, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::Gateway;

#[derive(Error, Debug)]
pub enum GatewayBuilderError {
    #[error("URL parsing error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Gateway client initialization error: {0}")]
    ClientInitError(String),

    #[error("Timeout must be positive")]
    InvalidTimeout,
}

#[derive(Debug, Default)]
pub struct GatewayBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GatewayBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn from_config(self, config: &GatewayClientConfiguration) -> Self {
        self.base_url(config.base_url.clone()).timeout(config.timeout)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn build(self) -> Result<Gateway, GatewayBuilderError> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(GatewayBuilderError::InvalidUrl(base_url.to_string()));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(GatewayBuilderError::InvalidTimeout);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayBuilderError::ClientInitError(e.to_string()))?;

        let gateway = Gateway::with_client(base_url, client);
        debug!("Created gateway client: {:#?}", gateway.base_url());

        Ok(gateway)
    }
}

impl Gateway {
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }
}
