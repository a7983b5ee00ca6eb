//! Command line definition and option mapping

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use nextid_core::Identifier;
use nextid_scan::ScanConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlobalOptions {
    /// TOML configuration file
    pub config: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
    /// `-v` count
    pub verbose: u8,
}

impl GlobalOptions {
    /// Extract from top-level matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let log_format = match matches.get_one::<String>("log-format").map(String::as_str) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            log_format,
            verbose: matches.get_count("verbose"),
        }
    }

    /// Configuration file contents, or defaults when no file was given
    ///
    /// # Errors
    /// Fails if the file is unreadable or not valid configuration
    pub fn load_config(&self) -> Result<ScanConfig> {
        match &self.config {
            Some(path) => ScanConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display())),
            None => Ok(ScanConfig::default()),
        }
    }
}

/// Build the `nextid` command
#[must_use]
pub fn command() -> Command {
    Command::new("nextid")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Allocate the next free identifier across main and open pull requests")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (repeat for trace)"),
        )
        .subcommand(
            Command::new("next")
                .about("Compute the next identifier")
                .arg(
                    Arg::new("repo-root")
                        .long("repo-root")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .help("Local checkout holding the baseline"),
                )
                .arg(
                    Arg::new("artifact")
                        .long("artifact")
                        .value_name("PATH")
                        .help("Artifact path relative to the repository root"),
                )
                .arg(
                    Arg::new("repo")
                        .long("repo")
                        .value_name("OWNER/NAME")
                        .help("GitHub repository; discovered from origin when omitted"),
                )
                .arg(threshold_arg())
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .value_name("STR")
                        .help("Prefix for the formatted identifier"),
                )
                .arg(
                    Arg::new("concurrency")
                        .long("concurrency")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Concurrent artifact fetches"),
                )
                .arg(
                    Arg::new("fetch-timeout")
                        .long("fetch-timeout")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64))
                        .help("Per-fetch timeout in seconds"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64))
                        .help("Timeout for the whole pull request scan in seconds"),
                )
                .arg(
                    Arg::new("offline")
                        .long("offline")
                        .action(ArgAction::SetTrue)
                        .help("Skip pull request scanning"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("parse")
                .about("List the identifiers found in a local file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(threshold_arg())
                .arg(json_arg()),
        )
}

fn threshold_arg() -> Arg {
    Arg::new("threshold")
        .long("threshold")
        .value_name("N")
        .value_parser(value_parser!(Identifier))
        .help("Smallest identifier considered allocated")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// Threshold given on the command line, if any
#[must_use]
pub fn threshold(args: &ArgMatches) -> Option<Identifier> {
    args.get_one::<Identifier>("threshold").copied()
}

/// Apply `next` flags on top of `config`
///
/// # Errors
/// Fails if the resulting configuration is invalid
pub fn apply_next_args(mut config: ScanConfig, args: &ArgMatches) -> Result<ScanConfig> {
    if let Some(root) = args.get_one::<PathBuf>("repo-root") {
        config = config.with_repo_root(root.clone());
    }
    if let Some(artifact) = args.get_one::<String>("artifact") {
        config = config.with_artifact_path(artifact.clone());
    }
    if let Some(repo) = args.get_one::<String>("repo") {
        config = config.with_repository(repo.clone());
    }
    if let Some(threshold) = threshold(args) {
        config = config.with_threshold(threshold);
    }
    if let Some(prefix) = args.get_one::<String>("prefix") {
        config = config.with_prefix(prefix.clone());
    }
    if let Some(&concurrency) = args.get_one::<usize>("concurrency") {
        config = config.with_max_concurrent_fetches(concurrency);
    }
    if let Some(&secs) = args.get_one::<u64>("fetch-timeout") {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }
    if let Some(&secs) = args.get_one::<u64>("timeout") {
        config = config.with_overall_timeout(Duration::from_secs(secs));
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}
