use anyhow::{Context, Result};
use clap::ArgMatches;
use nextid_cli::{cli, logging, GlobalOptions, ParseSummary, TextReport};
use nextid_core::IdentifierParser;
use nextid_scan::{FileBaseline, ScanError, Scanner};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    let global = GlobalOptions::from_matches(&matches);
    logging::init(global.log_format, global.verbose);

    let outcome = match matches.subcommand() {
        Some(("next", args)) => next(&global, args).await,
        Some(("parse", args)) => parse(&global, args),
        _ => Ok(ExitCode::FAILURE),
    };

    outcome.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::FAILURE
    })
}

async fn next(global: &GlobalOptions, args: &ArgMatches) -> Result<ExitCode> {
    let config = cli::apply_next_args(global.load_config()?, args)?;

    let scanner = if args.get_flag("offline") {
        let baseline = FileBaseline::new(config.baseline_path());
        Scanner::new(config, baseline)?
            .with_host_unavailable("offline: open pull requests not scanned")
    } else {
        Scanner::from_config(config).await?
    };

    let report = match scanner.report_until(ctrl_c()).await {
        Ok(report) => report,
        Err(ScanError::Cancelled) => {
            eprintln!("cancelled");
            return Ok(ExitCode::from(130));
        }
        Err(e) => return Err(e.into()),
    };

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", TextReport(&report));
    }

    Ok(if report.is_usable() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse(global: &GlobalOptions, args: &ArgMatches) -> Result<ExitCode> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing FILE argument")?;
    let threshold = match cli::threshold(args) {
        Some(threshold) => threshold,
        None => global.load_config()?.threshold,
    };

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let ids = IdentifierParser::new(threshold).parse(&String::from_utf8_lossy(&bytes));
    tracing::debug!(path = %path.display(), count = ids.len(), "parsed file");

    let summary = ParseSummary::from(&ids);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
