//! Testing utilities for the nextid workspace
//!
//! Shared fixtures and a canned [`ProposalHost`].

#![allow(missing_docs)]

use async_trait::async_trait;
use nextid_core::{BaselineSource, ConfigurationError, HeadRef, Identifier, Proposal};
use nextid_remote::{Listing, ProposalHost, TransportError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Render identifiers as a C#-style enum, with a reserved `None = 0`
pub fn enum_source(ids: &[Identifier]) -> String {
    let mut out = String::from("namespace Example.Common\n{\n\tpublic enum DiagnosticId\n\t{\n\t\tNone = 0,\n");
    for (i, id) in ids.iter().enumerate() {
        out.push_str(&format!("\t\tRule{i} = {id},\n"));
    }
    out.push_str("\t}\n}\n");
    out
}

/// Proposal numbered `number` whose head is `head{number}`
pub fn proposal(number: u64) -> Proposal {
    Proposal::new(number, format!("Proposal {number}"), format!("head{number}"))
}

/// Scripted response for one head
#[derive(Debug, Clone)]
pub enum Canned {
    Content(String),
    Missing,
    Fail(TransportError),
    /// Respond after a delay
    Delayed(Duration, Box<Canned>),
}

/// In-memory [`ProposalHost`] returning scripted data
#[derive(Debug, Default)]
pub struct CannedHost {
    listing: Option<Result<Listing, TransportError>>,
    responses: HashMap<HeadRef, Canned>,
    fetches: AtomicUsize,
    listings: AtomicUsize,
}

impl CannedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an open proposal whose artifact contains `ids`
    pub fn with_proposal(self, number: u64, ids: &[Identifier]) -> Self {
        self.with_response(proposal(number), Canned::Content(enum_source(ids)))
    }

    /// Add an open proposal with a scripted response
    pub fn with_response(mut self, proposal: Proposal, canned: Canned) -> Self {
        self.responses.insert(proposal.head.clone(), canned);
        let listing = self.listing.get_or_insert_with(|| Ok(Listing::default()));
        if let Ok(listing) = listing {
            listing.proposals.push(proposal);
        }
        self
    }

    /// Mark the listing as stopping short of the full list
    pub fn truncated_listing(mut self, reason: &str) -> Self {
        let listing = self.listing.get_or_insert_with(|| Ok(Listing::default()));
        if let Ok(listing) = listing {
            listing.truncated = Some(reason.to_string());
        }
        self
    }

    /// Make listing fail
    pub fn failing_listing(mut self, error: TransportError) -> Self {
        self.listing = Some(Err(error));
        self
    }

    /// Number of `fetch_artifact` calls made
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of `list_open_proposals` calls made
    pub fn listing_count(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

async fn respond(canned: &Canned) -> Result<Option<String>, TransportError> {
    let mut canned = canned;
    while let Canned::Delayed(delay, inner) = canned {
        tokio::time::sleep(*delay).await;
        canned = inner.as_ref();
    }
    match canned {
        Canned::Content(text) => Ok(Some(text.clone())),
        Canned::Missing => Ok(None),
        Canned::Fail(err) => Err(err.clone()),
        Canned::Delayed(..) => unreachable!("delays unwrapped above"),
    }
}

#[async_trait]
impl ProposalHost for CannedHost {
    async fn list_open_proposals(&self) -> Result<Listing, TransportError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        self.listing.clone().unwrap_or_else(|| Ok(Listing::default()))
    }

    async fn fetch_artifact(
        &self,
        head: &HeadRef,
        _path: &str,
    ) -> Result<Option<String>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(head) {
            Some(canned) => respond(canned).await,
            None => Ok(None),
        }
    }
}

/// Baseline held in memory
#[derive(Debug, Clone)]
pub struct MemoryBaseline(pub String);

impl MemoryBaseline {
    /// Baseline enum containing `ids`
    pub fn of(ids: &[Identifier]) -> Self {
        Self(enum_source(ids))
    }
}

impl BaselineSource for MemoryBaseline {
    fn read_baseline(&self) -> Result<String, ConfigurationError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "in-memory baseline".into()
    }
}
