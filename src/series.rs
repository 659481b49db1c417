//! Assembled time series and retrieval results.
//!
//! A [`Series`] stores the time grid as Julian Dates and the state vectors in
//! a flattened layout, six values per sample: `x, y, z, vx, vy, vz`. Frame and
//! units are properties of the whole series, echoed in the [`Signature`].

use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::Serialize;

use crate::constants::{BodyCommand, JulianDate, JD_TOLERANCE, MIN_SAMPLES};
use crate::ephemerist_errors::EphemeristError;

/// One body's state at an instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub t_jd: JulianDate,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// A gap-free, uniformly-stepped series of state-vector samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Sample timestamps, strictly increasing.
    pub t_jd: Vec<JulianDate>,
    /// Flattened position/velocity storage, `6 * t_jd.len()` values.
    pub pv: Vec<f64>,
}

impl Series {
    /// Build a series, enforcing the coherence invariants.
    pub fn new(t_jd: Vec<JulianDate>, pv: Vec<f64>) -> Result<Self, EphemeristError> {
        let series = Series { t_jd, pv };
        series.validate()?;
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.t_jd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t_jd.is_empty()
    }

    /// The sample at index `i`, or `None` past the end.
    pub fn sample(&self, i: usize) -> Option<Sample> {
        let t_jd = *self.t_jd.get(i)?;
        let v = self.pv.get(i * 6..i * 6 + 6)?;
        Some(Sample {
            t_jd,
            position: Vector3::new(v[0], v[1], v[2]),
            velocity: Vector3::new(v[3], v[4], v[5]),
        })
    }

    /// Check the series invariants: at least [`MIN_SAMPLES`] samples, flattened
    /// storage exactly six values per sample, strictly increasing timestamps.
    pub fn validate(&self) -> Result<(), EphemeristError> {
        if self.t_jd.len() < MIN_SAMPLES {
            return Err(EphemeristError::IncoherentSeries(format!(
                "{} sample(s), need at least {MIN_SAMPLES}",
                self.t_jd.len()
            )));
        }
        if self.pv.len() != self.t_jd.len() * 6 {
            return Err(EphemeristError::IncoherentSeries(format!(
                "{} vector values for {} timestamps",
                self.pv.len(),
                self.t_jd.len()
            )));
        }
        for pair in self.t_jd.windows(2) {
            if pair[1] <= pair[0] + JD_TOLERANCE {
                return Err(EphemeristError::IncoherentSeries(format!(
                    "timestamps not strictly increasing near JD {}",
                    pair[0]
                )));
            }
        }
        Ok(())
    }

    /// Append another window's samples, dropping any leading samples at or
    /// before the last accepted timestamp.
    ///
    /// Adjacent windows share their boundary instant because Horizons start
    /// and stop times are inclusive; the overlap is removed here.
    pub(crate) fn append_dedup(&mut self, other: &Series) {
        let mut idx = 0;
        if let Some(&last) = self.t_jd.last() {
            while idx < other.t_jd.len() && other.t_jd[idx] <= last + JD_TOLERANCE {
                idx += 1;
            }
        }
        self.t_jd.extend_from_slice(&other.t_jd[idx..]);
        self.pv.extend_from_slice(&other.pv[idx * 6..]);
    }
}

/// Echo of the resolved request parameters actually satisfied.
///
/// The start/stop times may differ from the originally requested range when
/// the service disclosed a supported-range boundary and the window was
/// clipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    pub command: String,
    pub center: String,
    pub start_time: String,
    pub stop_time: String,
    pub step_size: String,
    pub ref_system: String,
    pub ref_plane: String,
    pub out_units: String,
    pub vec_table: u8,
    pub time_type: String,
}

/// A complete, validated series plus its provenance signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    pub series: Series,
    pub signature: Signature,
}

/// Per-body vectors of a multi-body dataset sharing one time grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyVectors {
    pub name: String,
    pub pv: Vec<f64>,
}

/// Several bodies fetched over the same nominal range and step, with the
/// shared grid validated before assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiBodySeries {
    pub t_jd: Vec<JulianDate>,
    pub objects: BTreeMap<BodyCommand, BodyVectors>,
}
