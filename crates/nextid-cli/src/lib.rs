//! nextid command line
//!
//! Command definition, logging setup and terminal rendering for the
//! `nextid` binary.

#![warn(missing_docs)]

pub mod cli;
pub mod logging;
pub mod render;

pub use cli::{command, GlobalOptions, LogFormat};
pub use render::{ParseSummary, TextReport};
