//! Single-window fetcher: one bounded request/parse cycle with bounded
//! retries, capped exponential backoff, pacing, and the one-shot
//! range-correction retry.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::constants::MAX_SAMPLES_PER_CALL;
use crate::env_state::EphemeristEnv;
use crate::ephemerist_errors::EphemeristError;
use crate::parser;
use crate::range_hint::{self, RangeHint};
use crate::series::{Series, Signature};
use crate::service::{HorizonsResponse, HorizonsService, VectorRequest};
use crate::time::horizons_time;

/// Retry, backoff, pacing, and chunking knobs.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Retry budget for transient failures within one window.
    pub retries: u32,
    /// First backoff delay; doubles per attempt.
    pub backoff_base: Duration,
    /// Backoff delays never exceed this.
    pub backoff_cap: Duration,
    /// Minimum spacing between requests against the remote service.
    pub pacing_delay: Duration,
    /// Per-call sample ceiling used by the chunk scheduler.
    pub max_samples_per_call: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            retries: 5,
            backoff_base: Duration::from_secs(2),
            backoff_cap: Duration::from_secs(60),
            pacing_delay: Duration::from_millis(350),
            max_samples_per_call: MAX_SAMPLES_PER_CALL,
        }
    }
}

/// The outcome of one window: the parsed series, its provenance, and the
/// request actually satisfied (narrowed if the service disclosed a boundary).
#[derive(Debug, Clone)]
pub(crate) struct FetchedWindow {
    pub series: Series,
    pub signature: Signature,
    pub resolved: VectorRequest,
}

/// Fetch and parse one bounded window.
///
/// On a well-formed-but-rejected response the range-error interpreter is
/// consulted; if a corrected boundary differs from the request, the fetch is
/// retried exactly once with the narrowed window. The single retry prevents
/// infinite clipping loops.
pub(crate) fn fetch_window(
    service: &dyn HorizonsService,
    env: &EphemeristEnv,
    config: &FetchConfig,
    request: &VectorRequest,
) -> Result<FetchedWindow, EphemeristError> {
    fetch_window_inner(service, env, config, request, true)
}

fn fetch_window_inner(
    service: &dyn HorizonsService,
    env: &EphemeristEnv,
    config: &FetchConfig,
    request: &VectorRequest,
    allow_narrowing: bool,
) -> Result<FetchedWindow, EphemeristError> {
    let response = call_with_retries(service, env, config, request)?;

    if let Some(diagnostic) = response.error.as_deref() {
        return match narrowed_request(request, diagnostic) {
            Narrowing::Corrected(corrected) if allow_narrowing => {
                warn!(
                    start = %horizons_time(&corrected.start),
                    stop = %horizons_time(&corrected.stop),
                    "service disclosed a range boundary, retrying with narrowed window"
                );
                fetch_window_inner(service, env, config, &corrected, false)
            }
            Narrowing::Collapsed => Err(EphemeristError::NoProgress {
                cursor: horizons_time(&request.start),
            }),
            _ => Err(EphemeristError::ServiceDiagnostic(diagnostic.to_string())),
        };
    }

    let result = response.result.as_deref().unwrap_or_default();
    match parser::extract_block(result) {
        Some(block) => {
            let series = parser::parse_vectors(block)?;
            Ok(FetchedWindow {
                series,
                signature: request.signature(),
                resolved: request.clone(),
            })
        }
        None => {
            // markers missing: the diagnostics are inline in the result text
            match narrowed_request(request, result) {
                Narrowing::Corrected(corrected) if allow_narrowing => {
                    fetch_window_inner(service, env, config, &corrected, false)
                }
                Narrowing::Collapsed => Err(EphemeristError::NoProgress {
                    cursor: horizons_time(&request.start),
                }),
                _ => Err(EphemeristError::Parse {
                    preview: parser::preview(result),
                }),
            }
        }
    }
}

enum Narrowing {
    Corrected(VectorRequest),
    /// A boundary was disclosed but leaves nothing of the window.
    Collapsed,
    NoHint,
}

fn narrowed_request(request: &VectorRequest, message: &str) -> Narrowing {
    let Some(hint) = range_hint::interpret(message) else {
        return Narrowing::NoHint;
    };
    let mut corrected = request.clone();
    match hint {
        RangeHint::Earliest(boundary) => {
            if boundary >= request.stop {
                return Narrowing::Collapsed;
            }
            if boundary <= request.start {
                return Narrowing::NoHint;
            }
            corrected.start = boundary;
        }
        RangeHint::Latest(boundary) => {
            if boundary <= request.start {
                return Narrowing::Collapsed;
            }
            if boundary >= request.stop {
                return Narrowing::NoHint;
            }
            corrected.stop = boundary;
        }
    }
    Narrowing::Corrected(corrected)
}

/// Call the service, retrying transient failures with capped exponential
/// backoff. The pacing delay is honored before every attempt, so the spacing
/// against the remote service holds across successes and failures alike.
fn call_with_retries(
    service: &dyn HorizonsService,
    env: &EphemeristEnv,
    config: &FetchConfig,
    request: &VectorRequest,
) -> Result<HorizonsResponse, EphemeristError> {
    let attempts = config.retries.max(1);
    let mut last: Option<EphemeristError> = None;

    for attempt in 0..attempts {
        env.pace(config.pacing_delay);
        match service.state_vectors(env, request) {
            Ok(response) => return Ok(response),
            Err(err) if err.is_transient() => {
                debug!(attempt, error = %err, "transient Horizons failure");
                last = Some(err);
                if attempt + 1 < attempts {
                    std::thread::sleep(backoff_delay(config, attempt));
                }
            }
            Err(err) => return Err(err),
        }
    }

    Err(EphemeristError::TransientFetch {
        attempts,
        last: Box::new(last.unwrap_or_else(|| {
            EphemeristError::ServiceDiagnostic("no attempt recorded".into())
        })),
    })
}

/// `min(cap, base * 2^attempt + jitter)`, monotonically non-decreasing in the
/// attempt index and bounded by the cap.
fn backoff_delay(config: &FetchConfig, attempt: u32) -> Duration {
    let doubling = config.backoff_base.saturating_mul(1u32 << attempt.min(16));
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..250));
    (doubling + jitter).min(config.backoff_cap)
}
