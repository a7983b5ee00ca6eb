//! Collision-aware identifier allocation
//!
//! A pure function over the baseline set and the proposal samples. Only set
//! operations are involved, so the result does not depend on the order in
//! which samples arrived.

use crate::error::{AllocError, ConfigurationError};
use crate::id_set::{Identifier, IdentifierSet};
use crate::types::{Proposal, ProposalSample};
use std::collections::BTreeMap;

/// Identifiers a single proposal introduces over the baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalNewIds {
    /// The proposal
    pub proposal: Proposal,
    /// Non-empty set of new identifiers
    pub new_ids: IdentifierSet,
}

/// A value introduced independently by more than one proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The contested identifier
    pub id: Identifier,
    /// Proposal numbers claiming it, ascending
    pub proposals: Vec<u64>,
}

/// Outcome of one allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    /// Largest identifier in the baseline
    pub baseline_max: Identifier,
    /// Number of baseline identifiers
    pub baseline_count: usize,
    /// Baseline plus every proposal's new identifiers
    pub global_used: IdentifierSet,
    /// `max(global_used) + 1`
    pub next_id: Identifier,
    /// Proposals with non-empty new identifiers, by proposal number
    pub proposals_with_new_ids: Vec<ProposalNewIds>,
}

impl AllocationResult {
    /// Largest identifier in use anywhere
    #[inline]
    #[must_use]
    pub fn max_used(&self) -> Identifier {
        // global_used contains the non-empty baseline
        self.global_used.max().unwrap_or(self.baseline_max)
    }

    /// Values that more than one proposal introduces
    ///
    /// Reported only; allocation does not try to resolve them.
    #[must_use]
    pub fn collisions(&self) -> Vec<Collision> {
        let mut claims: BTreeMap<Identifier, Vec<u64>> = BTreeMap::new();
        for entry in &self.proposals_with_new_ids {
            for id in &entry.new_ids {
                claims.entry(id).or_default().push(entry.proposal.number);
            }
        }

        claims
            .into_iter()
            .filter(|(_, proposals)| proposals.len() > 1)
            .map(|(id, proposals)| Collision { id, proposals })
            .collect()
    }
}

/// Compute the next free identifier
///
/// # Errors
/// - `ConfigurationError::EmptyBaseline` if `baseline` is empty
/// - `AllocError::Exhausted` if the largest used identifier is `Identifier::MAX`
pub fn allocate(
    baseline: &IdentifierSet,
    samples: &[ProposalSample],
) -> Result<AllocationResult, AllocError> {
    let baseline_max = baseline
        .max()
        .ok_or_else(|| ConfigurationError::empty_baseline("snapshot"))?;

    let mut proposals_with_new_ids: Vec<ProposalNewIds> = samples
        .iter()
        .map(|sample| ProposalNewIds {
            proposal: sample.proposal.clone(),
            new_ids: sample.new_ids(baseline),
        })
        .filter(|entry| !entry.new_ids.is_empty())
        .collect();
    proposals_with_new_ids.sort_by(|a, b| {
        a.proposal
            .number
            .cmp(&b.proposal.number)
            .then_with(|| a.proposal.head.cmp(&b.proposal.head))
    });

    let global_used = proposals_with_new_ids
        .iter()
        .fold(baseline.clone(), |used, entry| used.union(&entry.new_ids));

    let max_used = global_used.max().unwrap_or(baseline_max);
    let next_id = max_used
        .checked_add(1)
        .ok_or(AllocError::Exhausted { max: max_used })?;

    tracing::debug!(
        baseline_max,
        max_used,
        next_id,
        proposals = proposals_with_new_ids.len(),
        "allocated identifier"
    );

    Ok(AllocationResult {
        baseline_max,
        baseline_count: baseline.len(),
        global_used,
        next_id,
        proposals_with_new_ids,
    })
}
