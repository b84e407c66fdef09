//! Bounded polling for a wallet provider to show up in the host environment.
//!
//! Browser extensions inject their provider object at some point after the
//! page started, there is no event telling us when. The probe checks
//! immediately and then every [`ProbeConfig::interval`] until the provider is
//! found or [`ProbeConfig::max_attempts`] checks have been made.

use crate::config::millis;
use futures::future::LocalBoxFuture;
use std::time::Duration;
use tracing::trace;

/// Source of delays for the probe and the connect deadline.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// [`Timer`] backed by the browser's `setTimeout`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeConfig {
    /// delay between two checks, serialized in milliseconds
    #[serde(with = "millis")]
    pub interval: Duration,
    /// number of checks made after the initial one
    pub max_attempts: u32,
}

impl ProbeConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeOutcome {
    /// the predicate returned `true` after `polls` intervals
    Detected { polls: u32 },
    /// the predicate never returned `true`
    Exhausted { polls: u32 },
}

impl ProbeOutcome {
    pub const fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }
}

/// run the `predicate` until it returns `true` or the attempt budget of
/// `config` is spent.
///
/// The predicate is called once right away: if it succeeds no delay is
/// awaited at all. Dropping the returned future cancels the pending delay.
pub async fn poll<P>(timer: &dyn Timer, config: &ProbeConfig, mut predicate: P) -> ProbeOutcome
where
    P: FnMut() -> bool,
{
    if predicate() {
        return ProbeOutcome::Detected { polls: 0 };
    }

    for poll in 1..=config.max_attempts {
        timer.sleep(config.interval).await;
        trace!(poll, "probing for the wallet provider");

        if predicate() {
            return ProbeOutcome::Detected { polls: poll };
        }
    }

    ProbeOutcome::Exhausted {
        polls: config.max_attempts,
    }
}
