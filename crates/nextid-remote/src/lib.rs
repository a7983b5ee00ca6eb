//! nextid remote access
//!
//! The boundary between the allocator and the code host:
//! - [`ProposalHost`]: narrow trait for listing open proposals and fetching
//!   an artifact at a proposal's head
//! - [`GitHubHost`]: GitHub REST implementation (pagination, auth, base64)
//! - [`RepoSlug`]: repository discovery from the `origin` remote
//! - Token discovery from the usual environment variables
//!
//! Test doubles implement [`ProposalHost`] directly and hand back canned data.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod github;
pub mod host;
pub mod slug;
pub mod token;

pub use error::TransportError;
pub use github::{GitHubHost, DEFAULT_API_BASE};
pub use host::{Listing, ProposalHost};
pub use slug::RepoSlug;
pub use token::{token_from, token_from_env, TOKEN_ENV_VARS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
