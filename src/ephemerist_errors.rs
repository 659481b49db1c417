use thiserror::Error;

/// Error taxonomy of the retrieval engine.
///
/// Retryable conditions (transport failures, 5xx, 429) never escape the
/// single-window fetcher: they are retried with backoff and, once the budget
/// is exhausted, surfaced as [`EphemeristError::TransientFetch`]. Everything
/// else reaching the chunk scheduler or the grid validator is non-retryable
/// by construction and is returned to the caller verbatim.
#[derive(Error, Debug)]
pub enum EphemeristError {
    #[error("unable to parse Horizons vector block, preview:\n{preview}")]
    Parse { preview: String },

    #[error("Horizons request failed after {attempts} attempts: {last}")]
    TransientFetch {
        attempts: u32,
        last: Box<EphemeristError>,
    },

    #[error("window failed to advance past {cursor}")]
    NoProgress { cursor: String },

    #[error("assembled series is incoherent: {0}")]
    IncoherentSeries(String),

    #[error("time grid mismatch for body {body}: {detail}")]
    GridMismatch { body: String, detail: String },

    #[error("Horizons diagnostic: {0}")]
    ServiceDiagnostic(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("malformed Horizons envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

impl EphemeristError {
    /// Whether a failed call is worth retrying with backoff.
    ///
    /// Rate limiting (429) and server-side errors (5xx) are transient, as are
    /// transport-level failures (timeouts, connection resets). Anything else
    /// indicates a request the service will keep rejecting.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            EphemeristError::HttpStatus(code) => *code == 429 || (500..600).contains(code),
            EphemeristError::UreqHttpError(_) => true,
            _ => false,
        }
    }
}
