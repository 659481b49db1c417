//! Range-error interpreter: best-effort extraction of a supported-range
//! boundary from Horizons free-text diagnostics.
//!
//! Horizons phrases its span limits in a few ways, e.g.
//!
//! ```text
//! No ephemeris for target "Voyager 1" prior to A.D. 1977-SEP-05 12:56:00.0000 UT
//! ...earliest available date is 1950-Jan-01 00:00 (UT)
//! No ephemeris for target after A.D. 2030-JAN-01 00:00:00.0000 UT
//! ```
//!
//! Sniffing free text is inherently brittle, so this module is an explicit
//! best-effort adapter: [`interpret`] returns `None` whenever no recognized
//! phrase is present and the caller surfaces the original error.

use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// A corrected boundary extracted from a service diagnostic, shifted one
/// second inside the disclosed limit so a retry does not hit the same reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeHint {
    /// The requested start precedes coverage; fetch from this instant.
    Earliest(NaiveDateTime),
    /// The requested stop exceeds coverage; fetch up to this instant.
    Latest(NaiveDateTime),
}

static EARLIEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)earliest\s+available\s+date\s+is\s+(\d{4}-[A-Za-z]{3}-\d{2}\s+\d{2}:\d{2}(?::\d{2})?)",
    )
    .unwrap()
});

static PRIOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)prior\s+to\s+A\.D\.\s+(\d{4}-[A-Za-z]{3}-\d{2}\s+\d{2}:\d{2}:\d{2})").unwrap()
});

static AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)after\s+A\.D\.\s+(\d{4}-[A-Za-z]{3}-\d{2}\s+\d{2}:\d{2}:\d{2})").unwrap()
});

/// Extract a corrected range boundary from a diagnostic message, if any
/// recognized phrase is present. Pure function of the message text.
pub fn interpret(message: &str) -> Option<RangeHint> {
    if let Some(captures) = EARLIEST_RE.captures(message) {
        let boundary = parse_month_abbrev(captures.get(1)?.as_str())?;
        return Some(RangeHint::Earliest(boundary + Duration::seconds(1)));
    }
    if let Some(captures) = PRIOR_RE.captures(message) {
        let boundary = parse_month_abbrev(captures.get(1)?.as_str())?;
        return Some(RangeHint::Earliest(boundary + Duration::seconds(1)));
    }
    if let Some(captures) = AFTER_RE.captures(message) {
        let boundary = parse_month_abbrev(captures.get(1)?.as_str())?;
        return Some(RangeHint::Latest(boundary - Duration::seconds(1)));
    }
    None
}

/// Parse the service's calendar-with-month-abbreviation format, with or
/// without a seconds field, e.g. `1977-SEP-05 12:56:00` or `1950-Jan-01 00:00`.
fn parse_month_abbrev(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%b-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%b-%d %H:%M"))
        .ok()
}
