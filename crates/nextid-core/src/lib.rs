//! nextid core - identifier parsing and allocation
//!
//! Pure logic with no I/O:
//! - Parses the used identifiers out of an enumeration snapshot
//! - Diffs each open proposal's snapshot against the mainline baseline
//! - Derives the next identifier that is unused anywhere
//! - Shapes the outcome into the stable report contract
//!
//! # Example
//!
//! ```rust
//! use nextid_core::{allocate, IdentifierParser, Proposal, ProposalSample};
//!
//! let parser = IdentifierParser::default();
//! let baseline = parser.parse("First = 2000,\nLast = 2159,");
//! let sample = ProposalSample::retrieved(
//!     Proposal::new(12, "Add rule", "0a1b2c"),
//!     "First = 2000,\nLast = 2159,\nNewRule = 2160,".to_string(),
//!     &parser,
//! );
//!
//! let result = allocate(&baseline, &[sample]).unwrap();
//! assert_eq!(result.next_id, 2161);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod allocator;
pub mod baseline;
pub mod error;
pub mod id_set;
pub mod parser;
pub mod report;
pub mod types;

pub use allocator::{allocate, AllocationResult, Collision, ProposalNewIds};
pub use baseline::{Baseline, BaselineSource};
pub use error::{AllocError, ConfigurationError};
pub use id_set::{Identifier, IdentifierSet, DEFAULT_THRESHOLD};
pub use parser::IdentifierParser;
pub use report::{
    AllocationReport, CollisionEntry, Coverage, ProposalEntry, ReportStatus, Reporter,
    DEFAULT_PREFIX,
};
pub use types::{FetchStatus, HeadRef, Proposal, ProposalSample};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with nextid core
    pub use crate::{
        allocate, AllocationReport, AllocationResult, Baseline, BaselineSource, Coverage,
        IdentifierParser, IdentifierSet, Proposal, ProposalSample, Reporter,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
