use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GatewayClientConfiguration {
    pub base_url: String,
    /// Applied to every single request
    pub timeout: Duration,
}

impl Default for GatewayClientConfiguration {
    fn default() -> Self {
        GatewayClientConfiguration {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayClientConfiguration {
    /// Does the base URL look like something we can send requests to?
    #[must_use]
    pub fn has_valid_base_url(&self) -> bool {
        Url::parse(&self.base_url)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false)
    }
}
