//! Error types for the Virtual Observatory validation subsystem.
//!
//! The validation tooling runs conesearch endpoint checks in a worker pool;
//! its failure modes live here so they can be shared without pulling in the
//! client.

use thiserror::Error;

/// Failure modes of VO conesearch validation runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The parallel validation worker pool failed before producing results.
    #[error("Parallel validation failed: {0}")]
    WorkerPool(String),

    /// A validation run was configured with an attribute the checker does
    /// not recognize.
    #[error("Invalid validation attribute: {0}")]
    InvalidAttribute(String),
}
