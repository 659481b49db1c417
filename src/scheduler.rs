//! Chunk scheduler: decompose an oversized query into bounded windows,
//! fetch them sequentially, and stitch the results into one series.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::env_state::EphemeristEnv;
use crate::ephemerist_errors::EphemeristError;
use crate::fetcher::{self, FetchConfig};
use crate::query::Query;
use crate::series::{RetrievalResult, Series};
use crate::service::{HorizonsService, VectorRequest};
use crate::time::horizons_time;

/// Fetch a whole query, chunking when its span at the requested step exceeds
/// the per-call sample ceiling.
///
/// Chunking is observationally transparent: the assembled series is identical
/// to what a single unbounded call would produce. Either a complete validated
/// series is returned or the query fails; there is no partial result.
pub(crate) fn fetch_series(
    service: &dyn HorizonsService,
    env: &EphemeristEnv,
    config: &FetchConfig,
    query: &Query,
) -> Result<RetrievalResult, EphemeristError> {
    // common case: the whole query fits in one call
    if query.total_samples() <= config.max_samples_per_call {
        let request = VectorRequest::for_window(query, query.start, query.stop);
        let fetched = fetcher::fetch_window(service, env, config, &request)?;
        let series = checked(fetched.series)?;
        return Ok(RetrievalResult {
            series,
            signature: fetched.resolved.signature(),
        });
    }

    let step_seconds = query.step.seconds() as i64;
    let max_span = Duration::seconds(step_seconds * (config.max_samples_per_call as i64 - 1));

    let mut assembled: Option<Series> = None;
    let mut resolved_start: NaiveDateTime = query.start;
    let mut cursor = query.start;

    while cursor < query.stop {
        let window_stop = query.stop.min(cursor + max_span);
        let request = VectorRequest::for_window(query, cursor, window_stop);
        let fetched = fetcher::fetch_window(service, env, config, &request)?;

        debug!(
            start = %horizons_time(&fetched.resolved.start),
            stop = %horizons_time(&fetched.resolved.stop),
            samples = fetched.series.len(),
            "window fetched"
        );

        match assembled.as_mut() {
            None => {
                resolved_start = fetched.resolved.start;
                assembled = Some(fetched.series);
            }
            Some(series) => series.append_dedup(&fetched.series),
        }

        if fetched.resolved.stop <= cursor {
            return Err(EphemeristError::NoProgress {
                cursor: horizons_time(&cursor),
            });
        }
        cursor = fetched.resolved.stop;
    }

    let series = assembled.ok_or_else(|| EphemeristError::NoProgress {
        cursor: horizons_time(&query.start),
    })?;
    let series = checked(series)?;

    let resolved = VectorRequest::for_window(query, resolved_start, cursor);
    Ok(RetrievalResult {
        series,
        signature: resolved.signature(),
    })
}

/// Final coherence gate: violations here are logic-level, never retried.
fn checked(series: Series) -> Result<Series, EphemeristError> {
    series.validate()?;
    Ok(series)
}
