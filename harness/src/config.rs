//! Test configuration: built-in defaults, overridden by an optional
//! `config/test-config.{yaml,toml,json}` file, overridden by `E2E__*` environment
//! variables. The result is an immutable value handed to every [`crate::TestContext`].
use std::env;
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use gateway::config::GatewayClientConfiguration;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Environment variable holding the fixture seed, which makes generated data repeatable
pub const TEST_SEED_VAR: &str = "TEST_SEED";
pub const ENV_PREFIX: &str = "E2E";
pub const DEFAULT_CONFIG_FILE: &str = "config/test-config";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    pub env: String,
    pub api: ApiConfiguration,
    pub outbox: OutboxConfig,
    pub services: ServicesConfig,
    pub test: TestSettings,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            env: "local".into(),
            api: ApiConfiguration::default(),
            outbox: OutboxConfig::default(),
            services: ServicesConfig::default(),
            test: TestSettings::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfiguration {
    pub base_url: String,
    pub timeout: String,
}

impl Default for ApiConfiguration {
    fn default() -> Self {
        ApiConfiguration {
            base_url: "http://localhost:8080/api".into(),
            timeout: "10s".into(),
        }
    }
}

/// How often the outbox worker publishes pending events
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutboxConfig {
    pub poll_interval: String,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        OutboxConfig {
            poll_interval: "100ms".into(),
        }
    }
}

/// Addresses of the individual services behind the gateway
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    pub auth: String,
    pub user: String,
    pub post: String,
    pub relation: String,
    pub notification: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        ServicesConfig {
            auth: "localhost:50051".into(),
            user: "localhost:50052".into(),
            post: "localhost:50053".into(),
            relation: "localhost:50054".into(),
            notification: "localhost:50055".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TestSettings {
    /// Delete everything a scenario created once it is done
    pub cleanup: bool,
    pub log_level: String,
    pub seed: Option<u64>,
    pub test_timeout: String,
    /// Upper bound for waiting on asynchronous side effects
    pub eventual_timeout: String,
    /// First delay between two polls; defaults to the outbox poll interval
    pub eventual_interval: Option<String>,
}

impl Default for TestSettings {
    fn default() -> Self {
        TestSettings {
            cleanup: true,
            log_level: "info".into(),
            seed: None,
            test_timeout: "2m".into(),
            eventual_timeout: "5s".into(),
            eventual_interval: None,
        }
    }
}

impl HarnessConfig {
    /// Loads `config/test-config.*` (if present) and the environment on top of the defaults
    #[allow(clippy::missing_errors_doc)]
    pub fn load() -> Result<HarnessConfig, HarnessError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// As [`HarnessConfig::load`], with the file name given without extension
    #[allow(clippy::missing_errors_doc)]
    pub fn load_from(file_stem: &str) -> Result<HarnessConfig, HarnessError> {
        let settings = Config::builder()
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: HarnessConfig = settings.try_deserialize()?;
        if let Some(seed) = seed_from_env()? {
            config.test.seed = Some(seed);
        }
        config.validate()?;
        debug!("Loaded test configuration {config:?}");
        Ok(config)
    }

    /// Parses a configuration held in a string, used for inline configurations
    #[allow(clippy::missing_errors_doc)]
    pub fn from_toml_str(toml: &str) -> Result<HarnessConfig, HarnessError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        let config: HarnessConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), HarnessError> {
        if !self.gateway_client_configuration()?.has_valid_base_url() {
            return Err(HarnessError::InvalidBaseUrl(self.api.base_url.clone()));
        }
        self.outbox_poll_interval()?;
        self.eventual_timeout()?;
        self.eventual_interval()?;
        self.test_timeout()?;
        Ok(())
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn request_timeout(&self) -> Result<Duration, HarnessError> {
        parse_duration(&self.api.timeout)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn outbox_poll_interval(&self) -> Result<Duration, HarnessError> {
        parse_duration(&self.outbox.poll_interval)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn eventual_timeout(&self) -> Result<Duration, HarnessError> {
        parse_duration(&self.test.eventual_timeout)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn eventual_interval(&self) -> Result<Duration, HarnessError> {
        match &self.test.eventual_interval {
            Some(interval) => parse_duration(interval),
            None => self.outbox_poll_interval(),
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn test_timeout(&self) -> Result<Duration, HarnessError> {
        parse_duration(&self.test.test_timeout)
    }

    /// The settings for the gateway client
    #[allow(clippy::missing_errors_doc)]
    pub fn gateway_client_configuration(&self) -> Result<GatewayClientConfiguration, HarnessError> {
        Ok(GatewayClientConfiguration {
            base_url: self.api.base_url.clone(),
            timeout: self.request_timeout()?,
        })
    }
}

fn seed_from_env() -> Result<Option<u64>, HarnessError> {
    match env::var(TEST_SEED_VAR) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| HarnessError::Setup(format!("{TEST_SEED_VAR}='{value}' is not a number: {e}"))),
        _ => Ok(None),
    }
}

/// Parses durations like `250ms`, `10s`, `2m` or `1h`. A bare number means seconds.
///
/// # Errors
/// Returns [`HarnessError::InvalidDuration`] for anything else
pub fn parse_duration(s: &str) -> Result<Duration, HarnessError> {
    lazy_static! {
        static ref DURATION_EXPR: Regex = Regex::new(r"^(\d+)\s*(ms|s|m|h)?$").unwrap();
    }

    let trimmed = s.trim();
    let captures = DURATION_EXPR
        .captures(trimmed)
        .ok_or_else(|| HarnessError::InvalidDuration(s.to_string()))?;
    let value = captures[1]
        .parse::<u64>()
        .map_err(|_| HarnessError::InvalidDuration(s.to_string()))?;

    let duration = match captures.get(2).map(|m| m.as_str()) {
        Some("ms") => Duration::from_millis(value),
        Some("m") => Duration::from_secs(value.saturating_mul(60)),
        Some("h") => Duration::from_secs(value.saturating_mul(3600)),
        _ => Duration::from_secs(value),
    };
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_durations() -> Result<(), HarnessError> {
        assert_eq!(parse_duration("100ms")?, Duration::from_millis(100));
        assert_eq!(parse_duration("10s")?, Duration::from_secs(10));
        assert_eq!(parse_duration(" 2m ")?, Duration::from_secs(120));
        assert_eq!(parse_duration("1h")?, Duration::from_secs(3600));
        assert_eq!(parse_duration("7")?, Duration::from_secs(7));
        Ok(())
    }

    #[test]
    fn parse_invalid_durations() {
        assert!(matches!(
            parse_duration("ten seconds"),
            Err(HarnessError::InvalidDuration(_))
        ));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn defaults() -> Result<(), HarnessError> {
        let config = HarnessConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.request_timeout()?, Duration::from_secs(10));
        assert_eq!(config.outbox_poll_interval()?, Duration::from_millis(100));
        // Polling follows the outbox unless told otherwise
        assert_eq!(config.eventual_interval()?, Duration::from_millis(100));
        assert_eq!(config.eventual_timeout()?, Duration::from_secs(5));
        assert!(config.test.cleanup);
        assert_eq!(config.services.notification, "localhost:50055");
        Ok(())
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<(), HarnessError> {
        let toml = r#"
        env = "ci"

        [api]
        base_url = "http://gateway:8080/api"

        [test]
        cleanup = false
        seed = 42
        eventual_interval = "250ms"
        "#;
        let config = HarnessConfig::from_toml_str(toml)?;
        assert_eq!(config.env, "ci");
        assert_eq!(config.api.base_url, "http://gateway:8080/api");
        assert_eq!(config.api.timeout, "10s");
        assert!(!config.test.cleanup);
        assert_eq!(config.test.seed, Some(42));
        assert_eq!(config.eventual_interval()?, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn invalid_duration_in_file_is_an_error() {
        let toml = r#"
        [outbox]
        poll_interval = "soon"
        "#;
        assert!(matches!(
            HarnessConfig::from_toml_str(toml),
            Err(HarnessError::InvalidDuration(_))
        ));
    }

    #[test]
    fn base_url_without_http_scheme_is_an_error() {
        for base_url in ["localhost:8080/api", "ftp://gateway/api", "not a url"] {
            let toml = format!("[api]\nbase_url = \"{base_url}\"\n");
            assert!(
                matches!(
                    HarnessConfig::from_toml_str(&toml),
                    Err(HarnessError::InvalidBaseUrl(ref url)) if url == base_url
                ),
                "{base_url} should be rejected"
            );
        }
    }

    #[test]
    fn gateway_configuration() -> Result<(), HarnessError> {
        let config = HarnessConfig::default();
        let gateway = config.gateway_client_configuration()?;
        assert_eq!(gateway.base_url, config.api.base_url);
        assert_eq!(gateway.timeout, Duration::from_secs(10));
        Ok(())
    }
}
