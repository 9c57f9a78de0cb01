//! Fixed-interval polling
//!
//! [`run_with_retry`] is the one loop used to wait on the external server:
//! once for the health endpoint and once for the bootstrap token file.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SetupError};

/// Interval between readiness probes
pub const WAIT_INTERVAL: Duration = Duration::from_secs(10);

/// Total time to wait for the server before giving up
pub const WAIT_BUDGET: Duration = Duration::from_secs(300);

/// How often and how long to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Policy attempting once per `interval` until `budget` is spent
    pub fn from_budget(interval: Duration, budget: Duration) -> Self {
        let attempts = if interval.is_zero() {
            1
        } else {
            u32::try_from(budget.as_millis() / interval.as_millis().max(1)).unwrap_or(u32::MAX)
        };
        Self {
            interval,
            max_attempts: attempts.max(1),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_budget(WAIT_INTERVAL, WAIT_BUDGET)
    }
}

/// Waits between attempts
pub trait Pause {
    fn pause(&self, interval: Duration);
}

/// Blocks the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Failure of a single probe
#[derive(Debug)]
pub enum ProbeError {
    /// Expected while the server starts; logged and retried
    Transient(String),
    /// Aborts the loop immediately
    Fatal(SetupError),
}

impl From<SetupError> for ProbeError {
    fn from(err: SetupError) -> Self {
        ProbeError::Fatal(err)
    }
}

/// Probe until `is_success` accepts a result or the attempt budget runs out.
///
/// Each attempt pauses for `policy.interval` first, then probes. Returns the
/// first accepted value, the first fatal error, or
/// [`SetupError::ConnectionTimeout`] after `policy.max_attempts` probes.
pub fn run_with_retry<T, P, S>(
    policy: &RetryPolicy,
    pause: &dyn Pause,
    operation: &str,
    mut probe: P,
    is_success: S,
) -> Result<T>
where
    T: std::fmt::Debug,
    P: FnMut() -> std::result::Result<T, ProbeError>,
    S: Fn(&T) -> bool,
{
    for attempt in 1..=policy.max_attempts {
        pause.pause(policy.interval);

        match probe() {
            Ok(value) if is_success(&value) => {
                debug!(operation, attempt, "probe succeeded");
                return Ok(value);
            }
            Ok(value) => info!(
                "Waiting for {operation}: got {value:?}. Trying again in {}s.",
                policy.interval.as_secs()
            ),
            Err(ProbeError::Transient(reason)) => info!(
                "Waiting for {operation}: {reason}. Trying again in {}s.",
                policy.interval.as_secs()
            ),
            Err(ProbeError::Fatal(err)) => return Err(err),
        }
    }

    Err(SetupError::ConnectionTimeout {
        operation: operation.to_string(),
        attempts: policy.max_attempts,
    })
}
