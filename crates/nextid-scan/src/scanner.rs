//! Allocation orchestrator
//!
//! One run reads the baseline, lists open proposals, samples each one
//! through the [`FetchPool`], allocates, and reports. The baseline read
//! completes (or fails) before any remote work starts. Remote problems
//! only ever degrade the coverage of a run.

use crate::baseline::FileBaseline;
use crate::config::{ConfigError, ScanConfig};
use crate::error::ScanError;
use crate::host::connect;
use crate::pool::{FetchPool, PoolStats};
use nextid_core::{
    allocate, AllocationReport, AllocationResult, Baseline, BaselineSource, Coverage,
    IdentifierParser, Reporter,
};
use nextid_remote::{Listing, ProposalHost};
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;

/// Where open proposals come from
#[derive(Clone)]
pub enum HostState {
    /// Proposals are listed and fetched through this host
    Connected(Arc<dyn ProposalHost>),
    /// Proposals are not scanned; the reason ends up in the report
    Unavailable(String),
}

impl std::fmt::Debug for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected(_) => f.write_str("Connected"),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Allocation over baseline and sampled proposals
    pub result: AllocationResult,
    /// How much of the open-proposal set was sampled
    pub coverage: Coverage,
    /// Fetch outcome counts
    pub stats: PoolStats,
}

/// Next-identifier scanner
pub struct Scanner {
    config: ScanConfig,
    parser: IdentifierParser,
    reporter: Reporter,
    baseline: Box<dyn BaselineSource>,
    host: HostState,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("baseline", &self.baseline.describe())
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Create scanner over `baseline` with no proposal host
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` if `config` fails validation
    pub fn new(
        config: ScanConfig,
        baseline: impl BaselineSource + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            parser: IdentifierParser::new(config.threshold),
            reporter: Reporter::new(config.prefix.clone()),
            config,
            baseline: Box::new(baseline),
            host: HostState::Unavailable("no proposal host configured".into()),
        })
    }

    /// Scanner reading the baseline from disk and proposals from GitHub
    ///
    /// A repository that cannot be resolved leaves the scanner without a
    /// host; its runs report `degraded` instead of failing.
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` if `config` fails validation
    pub async fn from_config(config: ScanConfig) -> Result<Self, ConfigError> {
        let baseline = FileBaseline::new(config.baseline_path());
        let host = match connect(&config).await {
            Ok(host) => HostState::Connected(Arc::new(host)),
            Err(e) => {
                tracing::warn!(error = %e, "proposal host unavailable");
                HostState::Unavailable(format!("proposal host unavailable: {e}"))
            }
        };
        Ok(Self::new(config, baseline)?.with_host_state(host))
    }

    /// With proposal host
    #[must_use]
    pub fn with_host(self, host: impl ProposalHost + 'static) -> Self {
        self.with_host_state(HostState::Connected(Arc::new(host)))
    }

    /// Skip proposal scanning, reporting `reason` as the degradation
    #[must_use]
    pub fn with_host_unavailable(self, reason: impl Into<String>) -> Self {
        self.with_host_state(HostState::Unavailable(reason.into()))
    }

    fn with_host_state(mut self, host: HostState) -> Self {
        self.host = host;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Proposal host state
    #[inline]
    #[must_use]
    pub fn host(&self) -> &HostState {
        &self.host
    }

    /// Run one allocation
    ///
    /// # Errors
    /// - `ScanError::Configuration` if the baseline is missing or empty
    /// - `ScanError::Allocation` if the identifier space is exhausted
    pub async fn run(&self) -> Result<ScanOutcome, ScanError> {
        let baseline = Baseline::load(self.baseline.as_ref(), &self.parser)?;
        let deadline = Instant::now() + self.config.overall_timeout();

        let (samples, coverage, stats) = match &self.host {
            HostState::Unavailable(reason) => {
                tracing::warn!(%reason, "open proposals not scanned");
                (
                    Vec::new(),
                    Coverage::Unavailable {
                        reason: reason.clone(),
                    },
                    PoolStats::default(),
                )
            }
            HostState::Connected(host) => {
                match tokio::time::timeout_at(deadline, host.list_open_proposals()).await {
                    Ok(Ok(Listing {
                        proposals,
                        truncated,
                    })) => {
                        tracing::info!(open = proposals.len(), "listed open proposals");
                        let pool = FetchPool::new(
                            Arc::clone(host),
                            self.config.artifact_path.clone(),
                            self.parser,
                            self.config.max_concurrent_fetches,
                            self.config.fetch_timeout(),
                        );
                        let outcome = pool.sample_all(&proposals, deadline).await;
                        let gaps: Vec<String> =
                            truncated.into_iter().chain(outcome.stats.shortfall()).collect();
                        let coverage = if gaps.is_empty() {
                            Coverage::Complete {
                                open_proposals: proposals.len(),
                            }
                        } else {
                            let reason = gaps.join("; ");
                            tracing::warn!(%reason, "proposal scan incomplete");
                            Coverage::Partial {
                                open_proposals: proposals.len(),
                                reason,
                            }
                        };
                        (outcome.samples, coverage, outcome.stats)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            error = %e,
                            retryable = e.is_retryable(),
                            "proposal listing failed; using baseline only"
                        );
                        (
                            Vec::new(),
                            Coverage::Unavailable {
                                reason: format!("proposal listing failed: {e}"),
                            },
                            PoolStats::default(),
                        )
                    }
                    Err(_) => {
                        tracing::warn!("proposal listing timed out; using baseline only");
                        (
                            Vec::new(),
                            Coverage::Unavailable {
                                reason: "proposal listing timed out".into(),
                            },
                            PoolStats::default(),
                        )
                    }
                }
            }
        };

        let result = allocate(baseline.ids(), &samples)?;
        for collision in result.collisions() {
            tracing::warn!(
                id = collision.id,
                proposals = ?collision.proposals,
                "identifier introduced by more than one proposal"
            );
        }

        tracing::info!(
            next_id = result.next_id,
            baseline_max = result.baseline_max,
            status = ?coverage.status(),
            "allocation complete"
        );
        Ok(ScanOutcome {
            result,
            coverage,
            stats,
        })
    }

    /// Run one allocation and shape it into a report
    ///
    /// Never fails: fatal errors become an `error` report.
    pub async fn report(&self) -> AllocationReport {
        match self.run().await {
            Ok(outcome) => self.reporter.report(&outcome.result, &outcome.coverage),
            Err(e) => {
                tracing::error!(error = %e, "allocation failed");
                self.reporter.error(&e)
            }
        }
    }

    /// Like [`Scanner::report`], abandoning the run when `cancel` resolves
    ///
    /// Outstanding fetches are dropped with the run; no partial report is
    /// produced.
    ///
    /// # Errors
    /// `ScanError::Cancelled` if `cancel` resolves first
    pub async fn report_until(
        &self,
        cancel: impl Future<Output = ()>,
    ) -> Result<AllocationReport, ScanError> {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::info!("allocation cancelled");
                Err(ScanError::Cancelled)
            }
            report = self.report() => Ok(report),
        }
    }
}
