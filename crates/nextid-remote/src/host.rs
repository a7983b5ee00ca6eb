//! Collaborator interface for the remote code host

use crate::error::TransportError;
use async_trait::async_trait;
use nextid_core::{HeadRef, Proposal};
use std::sync::Arc;

/// Open proposals returned by one listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Proposals with resolvable heads
    pub proposals: Vec<Proposal>,
    /// Set when the host stopped before the end of the list
    pub truncated: Option<String>,
}

impl Listing {
    /// Every open proposal
    #[inline]
    #[must_use]
    pub fn complete(proposals: Vec<Proposal>) -> Self {
        Self {
            proposals,
            truncated: None,
        }
    }

    /// True when no open proposal was left out
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.truncated.is_none()
    }
}

impl From<Vec<Proposal>> for Listing {
    fn from(proposals: Vec<Proposal>) -> Self {
        Self::complete(proposals)
    }
}

/// Lists open proposals and fetches artifact snapshots
///
/// Implementations attach authentication themselves; callers never see
/// credentials.
#[async_trait]
pub trait ProposalHost: Send + Sync {
    /// Currently open proposals with resolvable heads
    ///
    /// A host that cannot return the whole list marks the result truncated.
    async fn list_open_proposals(&self) -> Result<Listing, TransportError>;

    /// Artifact content at `head`, `None` if the artifact does not exist there
    async fn fetch_artifact(
        &self,
        head: &HeadRef,
        path: &str,
    ) -> Result<Option<String>, TransportError>;
}

#[async_trait]
impl<T: ProposalHost + ?Sized> ProposalHost for Arc<T> {
    async fn list_open_proposals(&self) -> Result<Listing, TransportError> {
        (**self).list_open_proposals().await
    }

    async fn fetch_artifact(
        &self,
        head: &HeadRef,
        path: &str,
    ) -> Result<Option<String>, TransportError> {
        (**self).fetch_artifact(head, path).await
    }
}
