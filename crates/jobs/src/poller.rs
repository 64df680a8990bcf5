//! Bounded-retry polling primitives.
//!
//! A poll loop repeatedly runs a check against a status endpoint until
//! the check reports a terminal result or the attempt budget runs out.
//! Transport and HTTP failures are transient misses: they count toward
//! the same attempt budget and change no state.

use std::time::Duration;

/// Default delay between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Default attempt budget for media-processing jobs (~20 minutes).
pub const PROCESSING_MAX_ATTEMPTS: u32 = 120;

/// Default attempt budget for translation jobs (~10 minutes).
pub const TRANSLATION_MAX_ATTEMPTS: u32 = 60;

/// Tunable parameters for one poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Delay between consecutive checks.
    pub interval: Duration,
    /// Number of checks before the loop gives up with a local timeout.
    pub max_attempts: u32,
}

impl PollerConfig {
    /// Defaults for tracking a media-processing job.
    pub fn processing() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: PROCESSING_MAX_ATTEMPTS,
        }
    }

    /// Defaults for tracking a translation sub-job.
    pub fn translation() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: TRANSLATION_MAX_ATTEMPTS,
        }
    }
}

/// What one successful check told us.
#[derive(Debug, Clone)]
pub enum PollTick {
    /// Job still running; keep polling.
    Continue,
    /// Job reached a terminal server-side status.
    Terminal(PollOutcome),
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job completed successfully.
    Completed,
    /// The server reported a terminal error for the job.
    Failed(String),
    /// The attempt budget ran out without a terminal status. This is a
    /// local conclusion; the server was never asked to stop.
    TimedOut,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
