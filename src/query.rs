//! Query construction: body, time range, step, and frame configuration.
//!
//! A [`Query`] is immutable once constructed and produces exactly one
//! [`crate::series::RetrievalResult`] through [`crate::ephemerist::Ephemerist::fetch`].

use chrono::NaiveDateTime;
use std::fmt;

use crate::constants::BodyCommand;
use crate::ephemerist_errors::EphemeristError;

/// Supported step units.
///
/// Horizons also accepts month and year steps, but those do not resolve to a
/// fixed number of seconds and cannot be chunked on a uniform grid, so they
/// are rejected at query construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Days,
    Hours,
    Minutes,
}

impl StepUnit {
    fn seconds(&self) -> u64 {
        match self {
            StepUnit::Days => 86_400,
            StepUnit::Hours => 3_600,
            StepUnit::Minutes => 60,
        }
    }

    fn letter(&self) -> char {
        match self {
            StepUnit::Days => 'd',
            StepUnit::Hours => 'h',
            StepUnit::Minutes => 'm',
        }
    }
}

/// A sampling step: a positive integer count of days, hours, or minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    value: u32,
    unit: StepUnit,
}

impl Step {
    pub fn new(value: u32, unit: StepUnit) -> Result<Self, EphemeristError> {
        if value == 0 {
            return Err(EphemeristError::InvalidQuery(
                "step value must be positive".into(),
            ));
        }
        Ok(Step { value, unit })
    }

    /// Step length in seconds, always positive.
    pub fn seconds(&self) -> u64 {
        self.value as u64 * self.unit.seconds()
    }
}

impl fmt::Display for Step {
    /// Horizons `STEP_SIZE` form, e.g. `"1 d"` or `"30 m"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.letter())
    }
}

/// Coordinate frame and output configuration, constant for a whole query.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    /// Horizons `CENTER`, e.g. `"@0"` for the solar system barycenter.
    pub center: String,
    pub ref_system: String,
    pub ref_plane: String,
    pub out_units: String,
    pub vec_table: u8,
    pub time_type: String,
}

impl Default for FrameSpec {
    fn default() -> Self {
        FrameSpec {
            center: "@0".into(),
            ref_system: "ICRF".into(),
            ref_plane: "FRAME".into(),
            out_units: "AU-D".into(),
            vec_table: 2,
            time_type: "UT".into(),
        }
    }
}

/// One logical acquisition request: body, time range, step, and frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub command: BodyCommand,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub step: Step,
    pub frame: FrameSpec,
}

impl Query {
    pub fn new(
        command: impl Into<String>,
        start: NaiveDateTime,
        stop: NaiveDateTime,
        step: Step,
        frame: FrameSpec,
    ) -> Result<Self, EphemeristError> {
        if stop <= start {
            return Err(EphemeristError::InvalidQuery(format!(
                "stop time {stop} is not after start time {start}"
            )));
        }
        Ok(Query {
            command: command.into(),
            start,
            stop,
            step,
            frame,
        })
    }

    /// Build a query from calendar strings as used by the acquisition
    /// drivers, e.g. `"2020-01-01 00:00:00"` (seconds optional).
    pub fn from_calendar(
        command: impl Into<String>,
        start: &str,
        stop: &str,
        step: Step,
        frame: FrameSpec,
    ) -> Result<Self, EphemeristError> {
        Query::new(
            command,
            parse_calendar(start)?,
            parse_calendar(stop)?,
            step,
            frame,
        )
    }

    /// Same range, step, and frame for a different body.
    pub fn for_command(&self, command: impl Into<String>) -> Self {
        Query {
            command: command.into(),
            ..self.clone()
        }
    }

    /// Number of samples an unbounded call over the full range would yield.
    pub fn total_samples(&self) -> usize {
        let span = (self.stop - self.start).num_seconds().max(0) as u64;
        (span / self.step.seconds()) as usize + 1
    }
}

pub(crate) fn parse_calendar(value: &str) -> Result<NaiveDateTime, EphemeristError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .map_err(|_| {
            EphemeristError::InvalidQuery(format!("unparseable calendar time: {value:?}"))
        })
}
