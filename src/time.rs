//! Calendar and Julian Date conversions.

use chrono::NaiveDateTime;

use crate::constants::{JulianDate, JD_UNIX_EPOCH, SECONDS_PER_DAY};

/// Format a datetime the way Horizons expects `START_TIME`/`STOP_TIME`,
/// e.g. `2020-01-01 00:00:00`.
pub fn horizons_time(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Julian Date of a calendar instant, via the Unix epoch.
pub fn calendar_to_jd(dt: &NaiveDateTime) -> JulianDate {
    JD_UNIX_EPOCH + dt.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}
