// src/core/errors.rs

use thiserror::Error;

/// Why a single probe call failed.
///
/// These never leave the probe layer as errors: [`crate::core::probe_client::ProbeClient`]
/// renders them into the message of an error `ScanResult`. The `Display` output is the
/// `<cause>` part of "<ScanName> for <target> failed: <cause>".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The remote service answered with `{"status": "error", "message": ...}`.
    #[error("{0}")]
    Remote(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("timed out")]
    TimedOut,

    #[error("cancelled")]
    Cancelled,

    #[error("probe task failed: {0}")]
    Task(String),
}
