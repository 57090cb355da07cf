//! Waiting for asynchronous side effects, like the notification the outbox publishes
//! after a follow. The probe is retried with exponential backoff until it reports a
//! value or the time budget is spent.
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use log::debug;
use tokio::time::sleep;

use crate::config::HarnessConfig;
use crate::error::HarnessError;

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Total time budget, measured from the first attempt
    pub timeout: Duration,
    pub initial_interval: Duration,
    /// Cap for the backoff
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(1),
            multiplier: 1.5,
        }
    }
}

impl PollPolicy {
    /// Polls start at the configured interval, which defaults to the outbox poll interval,
    /// and never wait longer than ten of those between two attempts.
    #[allow(clippy::missing_errors_doc)]
    pub fn from_config(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let interval = config.eventual_interval()?;
        Ok(Self {
            timeout: config.eventual_timeout()?,
            initial_interval: interval,
            max_interval: interval.saturating_mul(10),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay after the given (zero based) attempt: `initial_interval * multiplier^attempt`,
    /// capped at `max_interval`
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(64) as i32);
        let delay = self.initial_interval.as_secs_f64() * factor;
        if !delay.is_finite() || delay >= self.max_interval.as_secs_f64() {
            self.max_interval
        } else {
            Duration::from_secs_f64(delay)
        }
    }
}

/// Calls `probe` until it yields `Ok(Some(value))`. `Ok(None)` and errors both mean
/// "not yet"; errors are logged. Gives up with [`HarnessError::Timeout`] once
/// `policy.timeout` has passed. The probe is always called at least once.
///
/// # Errors
/// [`HarnessError::Timeout`] when the probe did not yield a value in time
pub async fn eventually<T, E, F, Fut>(
    policy: &PollPolicy,
    what: &str,
    mut probe: F,
) -> Result<T, HarnessError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: Display,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match probe().await {
            Ok(Some(value)) => {
                debug!("{what}: satisfied after {attempts} attempt(s) in {:?}", started.elapsed());
                return Ok(value);
            }
            Ok(None) => debug!("{what}: not yet (attempt {attempts})"),
            Err(e) => debug!("{what}: attempt {attempts} failed: {e}"),
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            return Err(HarnessError::Timeout {
                waited: elapsed,
                attempts,
            });
        }
        let delay = policy
            .delay_for_attempt(attempts - 1)
            .min(policy.timeout - elapsed);
        sleep(delay).await;
    }
}
