//! # Constants and type definitions for Ephemerist
//!
//! This module centralizes the **service limits**, **numeric tolerances**, and **common type
//! definitions** used throughout the `ephemerist` library.
//!
//! ## Overview
//!
//! - Horizons API endpoint and per-call sample ceiling
//! - Time conversions (days ↔ seconds, calendar ↔ JD)
//! - Tolerances for time-grid comparison and boundary deduplication
//!
//! These definitions are used by all main modules, including the sample parser, the chunk
//! scheduler, and the grid validator.

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date of the Unix epoch (1970-01-01 00:00:00 UTC)
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Tolerance when comparing Julian Date timestamps, in days.
///
/// Used both to drop the shared boundary instant when stitching adjacent
/// windows and to compare per-body time grids.
pub const JD_TOLERANCE: f64 = 1e-10;

/// Conservative ceiling on the number of samples Horizons returns per call.
///
/// Requests whose span at the requested step would exceed this are split
/// into windows by the chunk scheduler.
pub const MAX_SAMPLES_PER_CALL: usize = 8_900;

/// Minimum number of samples for a series to be considered valid.
pub const MIN_SAMPLES: usize = 2;

/// Number of payload lines kept in a parse error preview.
pub const PREVIEW_LINES: usize = 25;

/// JPL Horizons API endpoint.
pub const HORIZONS_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// A timestamp expressed as a Julian Date
pub type JulianDate = f64;

/// Horizons body identifier (`COMMAND` parameter), e.g. `"399"` or `"-31"`
pub type BodyCommand = String;
