//! nextid scanning
//!
//! Wires the pure allocator to its collaborators:
//! - [`FileBaseline`]: mainline snapshot read from the local checkout
//! - [`FetchPool`]: bounded, deadline-aware sampling of open proposals
//! - [`Scanner`]: one allocation run end to end, with degraded-mode
//!   accounting and cancellation
//! - [`ScanConfig`]: every path and limit, injected at construction
//!
//! ```no_run
//! use nextid_scan::{ScanConfig, Scanner};
//!
//! # async fn demo() -> Result<(), nextid_scan::ConfigError> {
//! let scanner = Scanner::from_config(ScanConfig::new().with_repo_root("/src/analyzers")).await?;
//! let report = scanner.report().await;
//! println!("{}", report.formatted_id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod baseline;
pub mod config;
pub mod error;
pub mod host;
pub mod pool;
pub mod scanner;

pub use baseline::FileBaseline;
pub use config::{ConfigError, ScanConfig, DEFAULT_ARTIFACT_PATH};
pub use error::ScanError;
pub use host::connect;
pub use pool::{FetchPool, PoolOutcome, PoolStats};
pub use scanner::{HostState, ScanOutcome, Scanner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
