//! Sample parser: turn one Horizons vector payload into a [`Series`].
//!
//! The `$$SOE`..`$$EOE` block may contain comma-delimited rows
//! (`JD, calendar label, X, Y, Z, VX, VY, VZ[, ...]`) or whitespace-delimited
//! table rows, and the two can be mixed in one payload. Rows are classified
//! independently by the presence of a comma. Fortran-style `D` exponents are
//! accepted alongside `E`.

use itertools::Itertools;

use crate::constants::{JulianDate, MIN_SAMPLES, PREVIEW_LINES};
use crate::ephemerist_errors::EphemeristError;
use crate::series::Series;

/// Locate the tabular block between the `$$SOE` and `$$EOE` markers.
///
/// Returns `None` when either marker is missing or out of order, which is how
/// Horizons signals a rejected request inside an otherwise well-formed
/// response.
pub(crate) fn extract_block(result: &str) -> Option<&str> {
    let start = result.find("$$SOE")?;
    let end = result.find("$$EOE")?;
    if end <= start {
        return None;
    }
    Some(result[start + 5..end].trim())
}

/// Parse a vector block into a series.
///
/// Blank lines and rows whose first token is not numeric are skipped. Fails
/// with [`EphemeristError::Parse`] when fewer than two valid samples are
/// extracted or the flattened vector count does not match the timestamp
/// count; the error carries a short preview of the offending block.
pub fn parse_vectors(block: &str) -> Result<Series, EphemeristError> {
    let mut t_jd: Vec<JulianDate> = Vec::new();
    let mut pv: Vec<f64> = Vec::new();

    for raw in block.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let row = if line.contains(',') {
            parse_csv_row(line)
        } else {
            parse_table_row(line)
        };
        if let Some((jd, vals)) = row {
            t_jd.push(jd);
            pv.extend_from_slice(&vals);
        }
    }

    if t_jd.len() < MIN_SAMPLES || pv.len() != t_jd.len() * 6 {
        return Err(EphemeristError::Parse {
            preview: preview(block),
        });
    }
    Ok(Series { t_jd, pv })
}

/// CSV row: `JD, calendar label, X, Y, Z, VX, VY, VZ[, ...]`.
///
/// The calendar-label column is not always present; it is detected from the
/// field count rather than assumed, so a minimal `JD, X..VZ` row still yields
/// six vector fields.
fn parse_csv_row(line: &str) -> Option<(JulianDate, [f64; 6])> {
    let mut parts: Vec<&str> = line.split(',').map(str::trim).collect();
    // some responses end rows with a trailing comma
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    let first = parts.first()?;
    if !first.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let jd: f64 = first.parse().ok()?;

    let offset = if parts.len() >= 8 { 2 } else { 1 };
    let fields = parts.get(offset..offset + 6)?;
    parse_six(fields).map(|vals| (jd, vals))
}

/// Whitespace table row: JD is the first token, the vector components are the
/// last six tokens.
fn parse_table_row(line: &str) -> Option<(JulianDate, [f64; 6])> {
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return None;
    }
    let jd: f64 = fields[0].parse().ok()?;
    parse_six(&fields[fields.len() - 6..]).map(|vals| (jd, vals))
}

fn parse_six(fields: &[&str]) -> Option<[f64; 6]> {
    let mut out = [0.0_f64; 6];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = parse_engineering(field)?;
    }
    Some(out)
}

/// Parse a real number accepting `D`/`d` exponent markers.
fn parse_engineering(field: &str) -> Option<f64> {
    field.replace(['D', 'd'], "E").parse().ok()
}

pub(crate) fn preview(block: &str) -> String {
    block.lines().take(PREVIEW_LINES).join("\n")
}
