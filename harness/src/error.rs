use std::time::Duration;

use gateway::GatewayError;
use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Unable to load the test configuration: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Could not make sense of duration '{0}', expected something like 100ms, 10s, 2m or 1h")]
    InvalidDuration(String),
    #[error("The gateway base URL '{0}' is not an absolute http(s) URL")]
    InvalidBaseUrl(String),
    #[error("Gateway error {0}")]
    Gateway(#[from] GatewayError),
    #[error("Gave up waiting after {waited:?} and {attempts} attempts")]
    Timeout { waited: Duration, attempts: u32 },
    #[error("Scenario set-up failed: {0}")]
    Setup(String),
}

impl From<gateway::GatewayBuilderError> for HarnessError {
    fn from(err: gateway::GatewayBuilderError) -> Self {
        HarnessError::Setup(format!("unable to create the gateway client: {err}"))
    }
}

impl HarnessError {
    /// The business error kind when the gateway rejected a call
    #[must_use]
    pub fn api_kind(&self) -> Option<gateway::ApiErrorKind> {
        match self {
            HarnessError::Gateway(err) => err.kind(),
            _ => None,
        }
    }
}
