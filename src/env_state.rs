//! # Ephemerist environment state
//!
//! This module defines [`crate::env_state::EphemeristEnv`], the **shared environment object**
//! used across the `ephemerist` library. It provides access to:
//!
//! - A persistent **HTTP client** for talking to the Horizons API.
//! - The **pacing clock** used to keep a minimum spacing between requests
//!   against the remote service.
//!
//! The pacing clock is a mutex-guarded timestamp: a caller running independent
//! queries from several threads still observes the minimum inter-request
//! spacing globally, because every request path goes through [`EphemeristEnv::pace`]
//! on the same shared instance.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use ureq::Agent;

/// Default per-call network timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(45);

/// This object is passed to the various functions in the library
/// to provide access to the shared state of the engine
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
/// * `pacing` - Timestamp of the most recent paced call, shared across threads
#[derive(Debug)]
pub struct EphemeristEnv {
    pub http_client: Agent,
    pacing: Mutex<Option<Instant>>,
}

impl Default for EphemeristEnv {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

impl EphemeristEnv {
    /// Create a new environment with the given per-call network timeout.
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let agent: Agent = config.into();

        EphemeristEnv {
            http_client: agent,
            pacing: Mutex::new(None),
        }
    }

    /// Block until at least `min_interval` has elapsed since the previous
    /// paced call, then stamp the clock.
    ///
    /// The lock is held across the sleep so that concurrent callers are
    /// serialized against the same clock instead of racing past it.
    pub(crate) fn pace(&self, min_interval: Duration) {
        let mut last = self.pacing.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                std::thread::sleep(min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod env_state_tests {
    use super::*;

    #[test]
    fn test_pace_enforces_spacing() {
        let env = EphemeristEnv::default();
        let interval = Duration::from_millis(30);

        env.pace(interval);
        let started = Instant::now();
        env.pace(interval);
        assert!(started.elapsed() >= interval);
    }

    #[test]
    fn test_pace_zero_interval_is_immediate() {
        let env = EphemeristEnv::default();
        env.pace(Duration::ZERO);
        let started = Instant::now();
        env.pace(Duration::ZERO);
        assert!(started.elapsed() < Duration::from_millis(20));
    }
}
