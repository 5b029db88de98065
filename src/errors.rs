//! Crate-level error type for Legacy Surveys queries.
//!
//! Network and HTTP failures propagate to the caller unchanged; malformed
//! data products surface as typed variants. A region query that matches no
//! brick is *not* an error — it is reported as `Ok(None)` by the client.

use crate::fits::FitsError;
use thiserror::Error;

/// Failure modes of a Legacy Surveys query.
#[derive(Error, Debug)]
pub enum LegacySurveyError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    /// The brick catalog could not be gunzipped.
    #[error("Failed to decompress brick catalog: {0}")]
    Decompress(#[source] std::io::Error),

    /// A catalog or tractor file was not a readable FITS binary table.
    #[error("Unparsable FITS table: {0}")]
    Fits(#[from] FitsError),
}

/// Convenience alias for `Result<T, LegacySurveyError>`.
pub type Result<T> = std::result::Result<T, LegacySurveyError>;
