//! Result reporter
//!
//! Shapes an allocation (or its failure) into the stable response
//! contract consumed by callers.

use crate::allocator::AllocationResult;
use crate::id_set::Identifier;
use serde::{Deserialize, Serialize};

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Full scan completed
    Success,
    /// Proposal listing or some fetches were unavailable
    Degraded,
    /// Baseline unusable, no allocation
    Error,
}

/// How much of the open-proposal set was actually sampled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// Every listed proposal was sampled
    Complete {
        /// Proposals returned by the lister
        open_proposals: usize,
    },
    /// Listing worked but some proposals could not be sampled
    Partial {
        /// Proposals returned by the lister
        open_proposals: usize,
        /// What went missing
        reason: String,
    },
    /// Open proposals were not scanned at all
    Unavailable {
        /// Why listing did not happen
        reason: String,
    },
}

impl Coverage {
    /// Report status implied by this coverage
    #[inline]
    #[must_use]
    pub fn status(&self) -> ReportStatus {
        match self {
            Self::Complete { .. } => ReportStatus::Success,
            Self::Partial { .. } | Self::Unavailable { .. } => ReportStatus::Degraded,
        }
    }

    /// Listed proposal count, zero when listing was unavailable
    #[inline]
    #[must_use]
    pub fn open_proposals(&self) -> usize {
        match self {
            Self::Complete { open_proposals } | Self::Partial { open_proposals, .. } => {
                *open_proposals
            }
            Self::Unavailable { .. } => 0,
        }
    }

    /// Degradation reason, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Complete { .. } => None,
            Self::Partial { reason, .. } | Self::Unavailable { reason } => Some(reason),
        }
    }
}

/// Per-proposal entry in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalEntry {
    /// Proposal number
    pub proposal_number: u64,
    /// Proposal title
    pub proposal_title: String,
    /// New identifiers, ascending
    pub new_ids: Vec<Identifier>,
}

/// Identifier claimed by several proposals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEntry {
    /// Contested identifier
    pub id: Identifier,
    /// Proposals introducing it
    pub proposal_numbers: Vec<u64>,
}

/// Allocation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Overall status
    pub status: ReportStatus,
    /// Next identifier, absent on error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<Identifier>,
    /// Largest baseline identifier
    pub baseline_max_id: Identifier,
    /// Largest identifier across baseline and proposals
    pub max_used_id: Identifier,
    /// Proposals returned by the lister
    pub total_open_proposals: usize,
    /// Proposals that introduce identifiers
    pub proposals_with_new_ids: Vec<ProposalEntry>,
    /// Prefix plus `next_id`
    pub formatted_id: String,
    /// Size of the global used set
    pub all_used_ids_count: usize,
    /// Size of the baseline set
    pub baseline_count: usize,
    /// Values new in more than one proposal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<CollisionEntry>,
    /// Error explanation or degradation reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AllocationReport {
    /// True when `next_id` is usable
    #[inline]
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.next_id.is_some()
    }
}

/// Builds [`AllocationReport`]s with a fixed identifier prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporter {
    prefix: String,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Prefix used for formatted identifiers unless configured otherwise
pub const DEFAULT_PREFIX: &str = "PH";

impl Reporter {
    /// Create reporter using `prefix` for formatted identifiers
    #[inline]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Format an identifier with the configured prefix
    #[inline]
    #[must_use]
    pub fn format_id(&self, id: Identifier) -> String {
        format!("{}{id}", self.prefix)
    }

    /// Report a completed allocation
    #[must_use]
    pub fn report(&self, result: &AllocationResult, coverage: &Coverage) -> AllocationReport {
        let proposals_with_new_ids = result
            .proposals_with_new_ids
            .iter()
            .map(|entry| ProposalEntry {
                proposal_number: entry.proposal.number,
                proposal_title: entry.proposal.title.clone(),
                new_ids: entry.new_ids.to_vec(),
            })
            .collect();

        let collisions = result
            .collisions()
            .into_iter()
            .map(|c| CollisionEntry {
                id: c.id,
                proposal_numbers: c.proposals,
            })
            .collect();

        AllocationReport {
            status: coverage.status(),
            next_id: Some(result.next_id),
            baseline_max_id: result.baseline_max,
            max_used_id: result.max_used(),
            total_open_proposals: coverage.open_proposals(),
            proposals_with_new_ids,
            formatted_id: self.format_id(result.next_id),
            all_used_ids_count: result.global_used.len(),
            baseline_count: result.baseline_count,
            collisions,
            message: coverage.reason().map(str::to_owned),
        }
    }

    /// Report a fatal failure; no identifier is produced
    #[must_use]
    pub fn error(&self, error: &dyn std::error::Error) -> AllocationReport {
        AllocationReport {
            status: ReportStatus::Error,
            next_id: None,
            baseline_max_id: 0,
            max_used_id: 0,
            total_open_proposals: 0,
            proposals_with_new_ids: Vec::new(),
            formatted_id: String::new(),
            all_used_ids_count: 0,
            baseline_count: 0,
            collisions: Vec::new(),
            message: Some(error.to_string()),
        }
    }
}
