//! Mainline snapshot from the local checkout

use nextid_core::{BaselineSource, ConfigurationError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads the baseline artifact from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBaseline {
    path: PathBuf,
}

impl FileBaseline {
    /// Baseline at `path`
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Artifact location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BaselineSource for FileBaseline {
    fn read_baseline(&self) -> Result<String, ConfigurationError> {
        match std::fs::read(&self.path) {
            // Tolerate stray invalid bytes; the parser only needs ASCII entries
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ConfigurationError::not_found(&self.path))
            }
            Err(e) => Err(ConfigurationError::io_error(&self.path, e)),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
