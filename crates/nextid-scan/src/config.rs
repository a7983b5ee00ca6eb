//! Scanner configuration
//!
//! Every path and limit is an explicit value handed to the scanner at
//! construction; nothing is read from process-global state.

use nextid_core::{Identifier, DEFAULT_PREFIX, DEFAULT_THRESHOLD};
use nextid_remote::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Artifact scanned when none is configured
pub const DEFAULT_ARTIFACT_PATH: &str = "Philips.CodeAnalysis.Common/DiagnosticId.cs";

/// Invalid configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ScanConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Local checkout holding the mainline snapshot
    pub repo_root: PathBuf,
    /// Artifact path relative to the repository root
    pub artifact_path: String,
    /// Smallest allocatable identifier
    pub threshold: Identifier,
    /// Prefix for formatted identifiers
    pub prefix: String,
    /// Concurrent artifact fetches
    pub max_concurrent_fetches: usize,
    /// Per-fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Timeout for the whole proposal phase in seconds
    pub overall_timeout_secs: u64,
    /// GitHub API endpoint
    pub api_base_url: String,
    /// `owner/name`; discovered from `origin` when unset
    pub repository: Option<String>,
    /// Pull request listing page cap
    pub max_pages: usize,
    /// API token; discovered from the environment when unset
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            artifact_path: DEFAULT_ARTIFACT_PATH.to_string(),
            threshold: DEFAULT_THRESHOLD,
            prefix: DEFAULT_PREFIX.to_string(),
            max_concurrent_fetches: 6,
            fetch_timeout_secs: 30,
            overall_timeout_secs: 120,
            api_base_url: DEFAULT_API_BASE.to_string(),
            repository: None,
            max_pages: 10,
            token: None,
        }
    }
}

impl ScanConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML or unknown keys
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` / `ConfigError::Parse`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// With repository root
    #[must_use]
    pub fn with_repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.repo_root = root.into();
        self
    }

    /// With artifact path
    #[must_use]
    pub fn with_artifact_path(mut self, path: impl Into<String>) -> Self {
        self.artifact_path = path.into();
        self
    }

    /// With threshold
    #[must_use]
    pub fn with_threshold(mut self, threshold: Identifier) -> Self {
        self.threshold = threshold;
        self
    }

    /// With prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// With fetch concurrency
    #[must_use]
    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    /// With per-fetch timeout
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = timeout.as_secs();
        self
    }

    /// With overall timeout
    #[must_use]
    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout_secs = timeout.as_secs();
        self
    }

    /// With repository slug
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// With API token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Per-fetch timeout
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Overall proposal-phase timeout
    #[inline]
    #[must_use]
    pub fn overall_timeout(&self) -> Duration {
        Duration::from_secs(self.overall_timeout_secs)
    }

    /// Absolute location of the mainline artifact
    #[must_use]
    pub fn baseline_path(&self) -> PathBuf {
        self.repo_root.join(&self.artifact_path)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_path.trim().is_empty() {
            return Err(ConfigError::invalid("artifact_path", "must not be empty"));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::invalid(
                "max_concurrent_fetches",
                "must be at least 1",
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::invalid("fetch_timeout_secs", "must be positive"));
        }
        if self.overall_timeout_secs == 0 {
            return Err(ConfigError::invalid("overall_timeout_secs", "must be positive"));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::invalid("max_pages", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.threshold, 2000);
        assert_eq!(config.prefix, "PH");
        assert_eq!(
            config.baseline_path(),
            PathBuf::from("./Philips.CodeAnalysis.Common/DiagnosticId.cs")
        );
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = ScanConfig::from_toml_str(
            r#"
            artifact_path = "src/Ids.cs"
            threshold = 100
            prefix = "XY"
            max_concurrent_fetches = 4
            repository = "acme/widgets"
            "#,
        )
        .unwrap();

        assert_eq!(config.artifact_path, "src/Ids.cs");
        assert_eq!(config.threshold, 100);
        assert_eq!(config.prefix, "XY");
        assert_eq!(config.max_concurrent_fetches, 4);
        assert_eq!(config.repository.as_deref(), Some("acme/widgets"));
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(matches!(
            ScanConfig::from_toml_str("bogus = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let err = ScanConfig::new()
            .with_max_concurrent_fetches(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_concurrent_fetches",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_empty_artifact_and_zero_timeout() {
        assert!(ScanConfig::new().with_artifact_path(" ").validate().is_err());
        assert!(ScanConfig::new()
            .with_fetch_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nextid.toml");
        std::fs::write(&path, "prefix = \"QQ\"\n").unwrap();

        let config = ScanConfig::from_file(&path).unwrap();
        assert_eq!(config.prefix, "QQ");

        let missing = ScanConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
