//! Error types for nextid core
//!
//! Only configuration problems are fatal. Transport failures and parse
//! anomalies are absorbed upstream and never reach these types.

use crate::id_set::Identifier;
use std::path::PathBuf;

/// The mainline snapshot cannot serve as a baseline
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Artifact file does not exist
    #[error("baseline artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Artifact exists but could not be read
    #[error("io error reading baseline {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact parsed to zero usable identifiers
    #[error("no identifiers found in baseline {origin}")]
    EmptyBaseline { origin: String },
}

impl ConfigurationError {
    /// Create not-found error for path
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create empty-baseline error
    pub fn empty_baseline(origin: impl Into<String>) -> Self {
        Self::EmptyBaseline {
            origin: origin.into(),
        }
    }
}

/// Allocation failures
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    /// Baseline unusable
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The largest used identifier has no successor
    #[error("identifier space exhausted: {max} is already in use")]
    Exhausted { max: Identifier },
}
