//! Mock Horizons services shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::NaiveDateTime;

use ephemerist::env_state::EphemeristEnv;
use ephemerist::ephemerist_errors::EphemeristError;
use ephemerist::fetcher::FetchConfig;
use ephemerist::service::{HorizonsResponse, HorizonsService, VectorRequest};
use ephemerist::time::calendar_to_jd;

/// Fast configuration so backoff and pacing do not slow the test suite.
pub fn quick_config() -> FetchConfig {
    FetchConfig {
        retries: 5,
        backoff_base: std::time::Duration::from_millis(1),
        backoff_cap: std::time::Duration::from_millis(4),
        pacing_delay: std::time::Duration::ZERO,
        ..FetchConfig::default()
    }
}

/// Calendar instant from a `"%Y-%m-%d %H:%M:%S"` string.
pub fn calendar(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Deterministic state vector for a timestamp, so that windows fetched
/// separately stitch into exactly what one unbounded call would produce.
pub fn synthetic_pv(jd: f64) -> [f64; 6] {
    [
        (jd * 0.017).sin(),
        (jd * 0.017).cos(),
        jd * 1e-6,
        -(jd * 0.017).cos() * 0.017,
        (jd * 0.017).sin() * 0.017,
        1e-6,
    ]
}

/// CSV payload for one window, with the inclusive start/stop semantics of the
/// real service and the `$$SOE`/`$$EOE` markers around the rows.
pub fn synthetic_payload(start: NaiveDateTime, stop: NaiveDateTime, step_seconds: i64) -> String {
    let mut rows = String::from("header text\n$$SOE\n");
    let mut cursor = start;
    while cursor <= stop {
        let jd = calendar_to_jd(&cursor);
        let pv = synthetic_pv(jd);
        rows.push_str(&format!(
            "{jd:.9}, A.D. {}, {:+.15E}, {:+.15E}, {:+.15E}, {:+.15E}, {:+.15E}, {:+.15E},\n",
            cursor.format("%Y-%b-%d %H:%M:%S.0000"),
            pv[0],
            pv[1],
            pv[2],
            pv[3],
            pv[4],
            pv[5],
        ));
        cursor += chrono::Duration::seconds(step_seconds);
    }
    rows.push_str("$$EOE\nfooter text");
    rows
}

/// Service that computes a correct synthetic payload for every requested
/// window, optionally failing selected invocations first. Records every
/// request it sees.
pub struct SyntheticHorizons {
    pub calls: Mutex<Vec<VectorRequest>>,
    /// Invocation indices (0-based, counting every attempt) that fail with
    /// the paired HTTP status instead of returning a payload.
    pub failures: Mutex<VecDeque<(usize, u16)>>,
}

impl SyntheticHorizons {
    pub fn new() -> Self {
        SyntheticHorizons {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    pub fn failing_at(failures: &[(usize, u16)]) -> Self {
        let mock = Self::new();
        *mock.failures.lock().unwrap() = failures.iter().copied().collect();
        mock
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl HorizonsService for SyntheticHorizons {
    fn state_vectors(
        &self,
        _env: &EphemeristEnv,
        request: &VectorRequest,
    ) -> Result<HorizonsResponse, EphemeristError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(request.clone());
        drop(calls);

        let mut failures = self.failures.lock().unwrap();
        if let Some(&(at, status)) = failures.front() {
            if at == index {
                failures.pop_front();
                return Err(EphemeristError::HttpStatus(status));
            }
        }

        Ok(HorizonsResponse {
            result: Some(synthetic_payload(
                request.start,
                request.stop,
                request.step.seconds() as i64,
            )),
            error: None,
        })
    }
}

/// One scripted reply per invocation, in order.
pub enum Scripted {
    /// `result` payload text.
    Payload(String),
    /// `error` diagnostic text.
    Diagnostic(String),
    /// Transport-level failure with this HTTP status.
    Status(u16),
}

/// Service that replays a fixed script and records every request.
pub struct ScriptedHorizons {
    pub calls: Mutex<Vec<VectorRequest>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl ScriptedHorizons {
    pub fn new(script: Vec<Scripted>) -> Self {
        ScriptedHorizons {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl HorizonsService for ScriptedHorizons {
    fn state_vectors(
        &self,
        _env: &EphemeristEnv,
        request: &VectorRequest,
    ) -> Result<HorizonsResponse, EphemeristError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Payload(text)) => Ok(HorizonsResponse {
                result: Some(text),
                error: None,
            }),
            Some(Scripted::Diagnostic(text)) => Ok(HorizonsResponse {
                result: None,
                error: Some(text),
            }),
            Some(Scripted::Status(code)) => Err(EphemeristError::HttpStatus(code)),
            None => panic!("mock service called more times than scripted"),
        }
    }
}
