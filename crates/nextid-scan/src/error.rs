//! Error types for scanning

use nextid_core::{AllocError, ConfigurationError};

/// Scan failures surfaced to the caller
///
/// Transport problems never appear here; they degrade the report instead.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Baseline missing or empty
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Allocation impossible
    #[error(transparent)]
    Allocation(#[from] AllocError),

    /// Caller aborted the run
    #[error("operation cancelled")]
    Cancelled,
}
