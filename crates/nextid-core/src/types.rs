//! Proposal data model
//!
//! Everything here lives for one allocation run and is then discarded.

use crate::id_set::IdentifierSet;
use crate::parser::IdentifierParser;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle for a point-in-time snapshot (a commit SHA on GitHub)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadRef(String);

impl HeadRef {
    /// Wrap a reference string
    #[inline]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeadRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HeadRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An open, unmerged change proposal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal number on the host
    pub number: u64,
    /// Human-readable title
    pub title: String,
    /// Snapshot the proposal currently points at
    pub head: HeadRef,
}

impl Proposal {
    /// Create proposal
    #[inline]
    pub fn new(number: u64, title: impl Into<String>, head: impl Into<HeadRef>) -> Self {
        Self {
            number,
            title: title.into(),
            head: head.into(),
        }
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.number, self.title)
    }
}

/// How a proposal's artifact fetch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Content retrieved and parsed
    Retrieved,
    /// Artifact does not exist at the proposal's head
    Absent,
    /// Transport or decode failure
    Failed(String),
    /// Per-fetch timeout elapsed
    TimedOut,
}

impl FetchStatus {
    /// True for outcomes that leave the scan incomplete
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::TimedOut)
    }
}

/// One proposal's view of the artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalSample {
    /// The sampled proposal
    pub proposal: Proposal,
    /// Fetch outcome
    pub status: FetchStatus,
    /// Raw artifact text, when retrieved
    pub fetched_content: Option<String>,
    /// Identifiers parsed from `fetched_content`
    pub parsed_ids: IdentifierSet,
}

impl ProposalSample {
    /// Sample with retrieved content, parsed immediately
    #[must_use]
    pub fn retrieved(proposal: Proposal, content: String, parser: &IdentifierParser) -> Self {
        let parsed_ids = parser.parse(&content);
        Self {
            proposal,
            status: FetchStatus::Retrieved,
            fetched_content: Some(content),
            parsed_ids,
        }
    }

    /// Sample for a proposal whose head lacks the artifact
    #[must_use]
    pub fn absent(proposal: Proposal) -> Self {
        Self::empty(proposal, FetchStatus::Absent)
    }

    /// Sample for a failed fetch
    #[must_use]
    pub fn failed(proposal: Proposal, reason: impl Into<String>) -> Self {
        Self::empty(proposal, FetchStatus::Failed(reason.into()))
    }

    /// Sample for a fetch that exceeded its timeout
    #[must_use]
    pub fn timed_out(proposal: Proposal) -> Self {
        Self::empty(proposal, FetchStatus::TimedOut)
    }

    fn empty(proposal: Proposal, status: FetchStatus) -> Self {
        Self {
            proposal,
            status,
            fetched_content: None,
            parsed_ids: IdentifierSet::new(),
        }
    }

    /// Identifiers this proposal introduces relative to `baseline`
    #[inline]
    #[must_use]
    pub fn new_ids(&self, baseline: &IdentifierSet) -> IdentifierSet {
        self.parsed_ids.difference(baseline)
    }
}
