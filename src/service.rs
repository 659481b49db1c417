//! Outbound seam: the "get state vectors" operation against the remote
//! ephemeris service.
//!
//! The engine only assumes synchronous request/response with possible
//! transient failure; everything service-specific lives behind the
//! [`HorizonsService`] trait so tests can substitute scripted or synthetic
//! implementations.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::constants::{BodyCommand, HORIZONS_API_URL};
use crate::env_state::EphemeristEnv;
use crate::ephemerist_errors::EphemeristError;
use crate::query::{FrameSpec, Query, Step};
use crate::series::Signature;
use crate::time::horizons_time;

/// One bounded "get state vectors" request, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRequest {
    pub command: BodyCommand,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub step: Step,
    pub frame: FrameSpec,
}

impl VectorRequest {
    /// The request for one window of a query.
    pub(crate) fn for_window(query: &Query, start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        VectorRequest {
            command: query.command.clone(),
            start,
            stop,
            step: query.step,
            frame: query.frame.clone(),
        }
    }

    /// Provenance echo of the parameters this request carries.
    pub(crate) fn signature(&self) -> Signature {
        Signature {
            command: self.command.clone(),
            center: self.frame.center.clone(),
            start_time: horizons_time(&self.start),
            stop_time: horizons_time(&self.stop),
            step_size: self.step.to_string(),
            ref_system: self.frame.ref_system.clone(),
            ref_plane: self.frame.ref_plane.clone(),
            out_units: self.frame.out_units.clone(),
            vec_table: self.frame.vec_table,
            time_type: self.frame.time_type.clone(),
        }
    }

    /// Horizons API query parameters for this request.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "json".into()),
            ("COMMAND", quote(&self.command)),
            ("MAKE_EPHEM", quote("YES")),
            ("EPHEM_TYPE", quote("VECTORS")),
            ("OBJ_DATA", quote("NO")),
            ("CENTER", quote(&self.frame.center)),
            ("START_TIME", quote(&horizons_time(&self.start))),
            ("STOP_TIME", quote(&horizons_time(&self.stop))),
            ("STEP_SIZE", quote(&self.step.to_string())),
            ("REF_SYSTEM", quote(&self.frame.ref_system)),
            ("REF_PLANE", quote(&self.frame.ref_plane)),
            ("OUT_UNITS", quote(&self.frame.out_units)),
            ("VEC_TABLE", self.frame.vec_table.to_string()),
            ("CSV_FORMAT", quote("YES")),
            ("VEC_LABELS", quote("NO")),
            ("VEC_DELTA_T", quote("NO")),
            ("VEC_CORR", quote("NONE")),
            ("TIME_TYPE", quote(&self.frame.time_type)),
        ]
    }
}

/// Horizons quotes its string-valued parameters.
fn quote(value: &str) -> String {
    format!("'{value}'")
}

/// JSON envelope returned by the Horizons API.
///
/// Exactly one of `result` (the textual payload bracketing tabular rows with
/// `$$SOE`/`$$EOE` markers) or `error` (a free-text diagnostic) is meaningful.
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonsResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The one logical outbound operation of the engine.
pub trait HorizonsService {
    fn state_vectors(
        &self,
        env: &EphemeristEnv,
        request: &VectorRequest,
    ) -> Result<HorizonsResponse, EphemeristError>;
}

impl<S: HorizonsService + ?Sized> HorizonsService for std::sync::Arc<S> {
    fn state_vectors(
        &self,
        env: &EphemeristEnv,
        request: &VectorRequest,
    ) -> Result<HorizonsResponse, EphemeristError> {
        (**self).state_vectors(env, request)
    }
}

/// Production implementation over the shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct HorizonsApi {
    url: String,
}

impl Default for HorizonsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl HorizonsApi {
    pub fn new() -> Self {
        HorizonsApi {
            url: HORIZONS_API_URL.into(),
        }
    }

    /// Point the client at a different endpoint (e.g. a local test server).
    pub fn with_url(url: impl Into<String>) -> Self {
        HorizonsApi { url: url.into() }
    }
}

impl HorizonsService for HorizonsApi {
    fn state_vectors(
        &self,
        env: &EphemeristEnv,
        request: &VectorRequest,
    ) -> Result<HorizonsResponse, EphemeristError> {
        let mut builder = env.http_client.get(&self.url);
        for (key, value) in request.params() {
            builder = builder.query(key, &value);
        }
        match builder.call() {
            Ok(mut response) => {
                let body = response.body_mut().read_to_string()?;
                Ok(serde_json::from_str(&body)?)
            }
            Err(ureq::Error::StatusCode(code)) => Err(EphemeristError::HttpStatus(code)),
            Err(err) => Err(EphemeristError::UreqHttpError(err)),
        }
    }
}

#[cfg(test)]
mod service_tests {
    use super::*;
    use crate::query::{Query, Step, StepUnit};

    fn request() -> VectorRequest {
        let step = Step::new(1, StepUnit::Days).unwrap();
        let query = Query::from_calendar(
            "399",
            "2020-01-01 00:00:00",
            "2020-01-03 00:00:00",
            step,
            FrameSpec::default(),
        )
        .unwrap();
        VectorRequest::for_window(&query, query.start, query.stop)
    }

    #[test]
    fn test_params_are_quoted() {
        let params = request().params();
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("COMMAND"), "'399'");
        assert_eq!(get("START_TIME"), "'2020-01-01 00:00:00'");
        assert_eq!(get("STOP_TIME"), "'2020-01-03 00:00:00'");
        assert_eq!(get("STEP_SIZE"), "'1 d'");
        assert_eq!(get("format"), "json");
        assert_eq!(get("VEC_TABLE"), "2");
    }

    #[test]
    fn test_signature_echoes_request() {
        let signature = request().signature();
        assert_eq!(signature.command, "399");
        assert_eq!(signature.center, "@0");
        assert_eq!(signature.start_time, "2020-01-01 00:00:00");
        assert_eq!(signature.stop_time, "2020-01-03 00:00:00");
        assert_eq!(signature.step_size, "1 d");
    }

    #[test]
    fn test_envelope_deserialization() {
        let ok: HorizonsResponse =
            serde_json::from_str(r#"{"result": "$$SOE\n$$EOE", "signature": {"version": "1.2"}}"#)
                .unwrap();
        assert!(ok.result.is_some());
        assert!(ok.error.is_none());

        let rejected: HorizonsResponse =
            serde_json::from_str(r#"{"error": "earliest available date is 1950-Jan-01 00:00"}"#)
                .unwrap();
        assert!(rejected.result.is_none());
        assert!(rejected.error.is_some());
    }
}
