use env_logger::Env;

use crate::config::HarnessConfig;

/// Initialises `env_logger` once per process. `RUST_LOG` wins over the configured level.
/// Later calls, from other scenarios in the same test binary, are no-ops.
pub fn init(config: &HarnessConfig) {
    let env = Env::default().default_filter_or(config.test.log_level.as_str());
    let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
}
