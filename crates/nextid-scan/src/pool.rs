//! Bounded fetch pool for proposal snapshots
//!
//! Runs artifact fetches with a fixed degree of parallelism:
//! - One result slot per proposal, written exactly once
//! - Per-fetch timeout; failures become empty samples
//! - A shared deadline after which unfinished fetches are dropped
//!
//! Fetches are polled inside the caller's future, so dropping that future
//! cancels every outstanding request.

use futures::stream::{self, StreamExt};
use nextid_core::{FetchStatus, IdentifierParser, Proposal, ProposalSample};
use nextid_remote::ProposalHost;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Fetch outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Proposals handed to the pool
    pub submitted: usize,
    /// Content retrieved
    pub retrieved: usize,
    /// Artifact absent at head
    pub absent: usize,
    /// Transport or decode failures
    pub failed: usize,
    /// Per-fetch timeouts
    pub timed_out: usize,
    /// Not finished before the deadline
    pub unfinished: usize,
}

impl PoolStats {
    /// True when every proposal was sampled without failure
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.timed_out == 0 && self.unfinished == 0
    }

    /// Summary of what went missing, `None` when complete
    #[must_use]
    pub fn shortfall(&self) -> Option<String> {
        if self.is_complete() {
            return None;
        }

        let mut parts = Vec::new();
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        if self.timed_out > 0 {
            parts.push(format!("{} timed out", self.timed_out));
        }
        if self.unfinished > 0 {
            parts.push(format!("{} not reached before deadline", self.unfinished));
        }
        Some(format!(
            "{} of {} proposal fetches incomplete ({})",
            self.failed + self.timed_out + self.unfinished,
            self.submitted,
            parts.join(", ")
        ))
    }

    fn record(&mut self, status: &FetchStatus) {
        match status {
            FetchStatus::Retrieved => self.retrieved += 1,
            FetchStatus::Absent => self.absent += 1,
            FetchStatus::Failed(_) => self.failed += 1,
            FetchStatus::TimedOut => self.timed_out += 1,
        }
    }
}

/// Samples gathered by one pool run
#[derive(Debug, Clone, Default)]
pub struct PoolOutcome {
    /// Finished samples in proposal order
    pub samples: Vec<ProposalSample>,
    /// Outcome counts
    pub stats: PoolStats,
}

/// Fetch pool for proposal artifacts
#[derive(Clone)]
pub struct FetchPool {
    host: Arc<dyn ProposalHost>,
    artifact_path: String,
    parser: IdentifierParser,
    max_concurrent: usize,
    fetch_timeout: Duration,
}

impl std::fmt::Debug for FetchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPool")
            .field("artifact_path", &self.artifact_path)
            .field("max_concurrent", &self.max_concurrent)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl FetchPool {
    /// Create pool
    ///
    /// `max_concurrent` is clamped to at least one.
    #[must_use]
    pub fn new(
        host: Arc<dyn ProposalHost>,
        artifact_path: impl Into<String>,
        parser: IdentifierParser,
        max_concurrent: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            host,
            artifact_path: artifact_path.into(),
            parser,
            max_concurrent: max_concurrent.max(1),
            fetch_timeout,
        }
    }

    /// Sample every proposal, stopping at `deadline`
    pub async fn sample_all(&self, proposals: &[Proposal], deadline: Instant) -> PoolOutcome {
        let mut slots: Vec<Option<ProposalSample>> = proposals.iter().map(|_| None).collect();

        let mut pending = stream::iter(proposals.iter().enumerate())
            .map(|(slot, proposal)| async move { (slot, self.sample(proposal).await) })
            .buffer_unordered(self.max_concurrent);

        loop {
            match tokio::time::timeout_at(deadline, pending.next()).await {
                Ok(Some((slot, sample))) => {
                    debug_assert!(slots[slot].is_none(), "slot written twice");
                    slots[slot] = Some(sample);
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!("proposal scan deadline elapsed; using completed samples");
                    break;
                }
            }
        }
        drop(pending);

        let mut stats = PoolStats {
            submitted: proposals.len(),
            ..PoolStats::default()
        };
        let mut samples = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Some(sample) => {
                    stats.record(&sample.status);
                    samples.push(sample);
                }
                None => stats.unfinished += 1,
            }
        }

        tracing::debug!(?stats, "fetch pool drained");
        PoolOutcome { samples, stats }
    }

    /// Fetch and parse one proposal; never fails
    async fn sample(&self, proposal: &Proposal) -> ProposalSample {
        let fetch = self.host.fetch_artifact(&proposal.head, &self.artifact_path);

        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(Some(content))) => {
                let sample = ProposalSample::retrieved(proposal.clone(), content, &self.parser);
                tracing::debug!(
                    proposal = proposal.number,
                    ids = sample.parsed_ids.len(),
                    "sampled proposal"
                );
                sample
            }
            Ok(Ok(None)) => {
                tracing::debug!(proposal = proposal.number, "artifact absent at head");
                ProposalSample::absent(proposal.clone())
            }
            Ok(Err(e)) => {
                tracing::debug!(
                    proposal = proposal.number,
                    error = %e,
                    retryable = e.is_retryable(),
                    "fetch failed"
                );
                ProposalSample::failed(proposal.clone(), e.to_string())
            }
            Err(_) => {
                tracing::debug!(proposal = proposal.number, "fetch timed out");
                ProposalSample::timed_out(proposal.clone())
            }
        }
    }
}
