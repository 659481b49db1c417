//! # Ephemerist: the retrieval engine façade
//!
//! This module defines the [`Ephemerist`] struct, the central façade that
//! wires together:
//!
//! 1. **Environment state** ([`EphemeristEnv`](crate::env_state::EphemeristEnv)) — the shared
//!    HTTP client and the process-wide pacing clock.
//! 2. **Service handle** — a [`HorizonsService`](crate::service::HorizonsService)
//!    implementation, by default the production [`HorizonsApi`](crate::service::HorizonsApi).
//! 3. **Fetch configuration** ([`FetchConfig`](crate::fetcher::FetchConfig)) — retry budget,
//!    backoff policy, pacing delay, and the per-call sample ceiling.
//!
//! Acquisition drivers construct one [`Query`](crate::query::Query) per logical request and
//! call [`Ephemerist::fetch`]; multi-body datasets on one shared grid go through
//! [`Ephemerist::fetch_grid`], which runs the grid validator across bodies.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use ephemerist::ephemerist::Ephemerist;
//! use ephemerist::query::{FrameSpec, Query, Step, StepUnit};
//!
//! let engine = Ephemerist::new();
//! let step = Step::new(1, StepUnit::Days).unwrap();
//! let query = Query::from_calendar(
//!     "399",
//!     "2020-01-01 00:00:00",
//!     "2020-02-01 00:00:00",
//!     step,
//!     FrameSpec::default(),
//! )
//! .unwrap();
//!
//! let result = engine.fetch(&query).unwrap();
//! assert_eq!(result.series.pv.len(), result.series.len() * 6);
//! ```

use std::collections::BTreeMap;

use crate::constants::BodyCommand;
use crate::env_state::EphemeristEnv;
use crate::ephemerist_errors::EphemeristError;
use crate::fetcher::FetchConfig;
use crate::grid;
use crate::query::Query;
use crate::scheduler;
use crate::series::{BodyVectors, MultiBodySeries, RetrievalResult};
use crate::service::{HorizonsApi, HorizonsService};

/// A body of a multi-body dataset: display name plus Horizons command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub name: String,
    pub command: BodyCommand,
}

impl Body {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Body {
            name: name.into(),
            command: command.into(),
        }
    }
}

/// The retrieval engine. One instance serves any number of queries; its
/// pacing clock keeps the minimum inter-request spacing across all of them.
pub struct Ephemerist {
    env: EphemeristEnv,
    config: FetchConfig,
    service: Box<dyn HorizonsService>,
}

impl Default for Ephemerist {
    fn default() -> Self {
        Self::new()
    }
}

impl Ephemerist {
    /// Engine against the production Horizons API with default configuration.
    pub fn new() -> Self {
        Ephemerist {
            env: EphemeristEnv::default(),
            config: FetchConfig::default(),
            service: Box::new(HorizonsApi::new()),
        }
    }

    /// Engine with an explicit service implementation and configuration.
    /// This is the seam used by tests to substitute a mock service.
    pub fn with_service(service: Box<dyn HorizonsService>, config: FetchConfig) -> Self {
        Ephemerist {
            env: EphemeristEnv::default(),
            config,
            service,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch one assembled, validated series for a query.
    ///
    /// The query either yields a complete series or fails entirely; no
    /// truncated series is ever returned.
    pub fn fetch(&self, query: &Query) -> Result<RetrievalResult, EphemeristError> {
        scheduler::fetch_series(self.service.as_ref(), &self.env, &self.config, query)
    }

    /// Fetch several bodies over the same nominal range and step, validating
    /// that all series share the first body's time grid.
    ///
    /// The `template` query supplies range, step, and frame; its body command
    /// is replaced per entry. A grid mismatch aborts the whole dataset.
    pub fn fetch_grid(
        &self,
        bodies: &[Body],
        template: &Query,
    ) -> Result<MultiBodySeries, EphemeristError> {
        let mut t_ref: Option<Vec<f64>> = None;
        let mut objects = BTreeMap::new();

        for body in bodies {
            let query = template.for_command(&body.command);
            let result = self.fetch(&query)?;

            match &t_ref {
                None => t_ref = Some(result.series.t_jd.clone()),
                Some(reference) => grid::validate_grid(reference, &result.series, &body.name)?,
            }
            objects.insert(
                body.command.clone(),
                BodyVectors {
                    name: body.name.clone(),
                    pv: result.series.pv,
                },
            );
        }

        let t_jd = t_ref.ok_or_else(|| {
            EphemeristError::InvalidQuery("fetch_grid called with no bodies".into())
        })?;
        Ok(MultiBodySeries { t_jd, objects })
    }
}
