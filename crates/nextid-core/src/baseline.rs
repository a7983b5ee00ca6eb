//! Baseline snapshot
//!
//! The mainline identifier set every proposal is diffed against.

use crate::error::ConfigurationError;
use crate::id_set::{Identifier, IdentifierSet};
use crate::parser::IdentifierParser;

/// Source of the mainline artifact text
///
/// Reading is synchronous: the baseline must be complete before any
/// proposal work starts.
pub trait BaselineSource: Send + Sync {
    /// Read the mainline artifact
    ///
    /// # Errors
    /// `ConfigurationError::NotFound` / `Io` when the artifact is unreadable
    fn read_baseline(&self) -> Result<String, ConfigurationError>;

    /// Human-readable origin used in error messages
    fn describe(&self) -> String;
}

/// Parsed, non-empty baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    ids: IdentifierSet,
    max: Identifier,
}

impl Baseline {
    /// Read and parse `source`
    ///
    /// # Errors
    /// Fails if the artifact is unreadable or yields no identifiers
    pub fn load(
        source: &dyn BaselineSource,
        parser: &IdentifierParser,
    ) -> Result<Self, ConfigurationError> {
        let text = source.read_baseline()?;
        let baseline = Self::from_ids(parser.parse(&text))
            .ok_or_else(|| ConfigurationError::empty_baseline(source.describe()))?;

        tracing::info!(
            origin = %source.describe(),
            count = baseline.ids.len(),
            max = baseline.max,
            "loaded baseline"
        );
        Ok(baseline)
    }

    /// Wrap an already-parsed set; `None` when empty
    #[must_use]
    pub fn from_ids(ids: IdentifierSet) -> Option<Self> {
        let max = ids.max()?;
        Some(Self { ids, max })
    }

    /// Baseline identifiers
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &IdentifierSet {
        &self.ids
    }

    /// Largest baseline identifier
    #[inline]
    #[must_use]
    pub fn max(&self) -> Identifier {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Text(&'static str);

    impl BaselineSource for Text {
        fn read_baseline(&self) -> Result<String, ConfigurationError> {
            Ok(self.0.to_string())
        }

        fn describe(&self) -> String {
            "inline".into()
        }
    }

    #[test]
    fn load_exposes_max() {
        let baseline = Baseline::load(
            &Text("A = 2000,\nB = 2001,\nC = 2159,"),
            &IdentifierParser::default(),
        )
        .unwrap();
        assert_eq!(baseline.max(), 2159);
        assert_eq!(baseline.ids().len(), 3);
    }

    #[test]
    fn sentinel_only_baseline_is_empty() {
        let err = Baseline::load(&Text("None = 0,"), &IdentifierParser::default()).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyBaseline { origin } if origin == "inline"));
    }
}
