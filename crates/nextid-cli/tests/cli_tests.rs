//! Binary Tests
//!
//! Runs the `nextid` executable against local fixtures only.

use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

const ARTIFACT: &str = "Philips.CodeAnalysis.Common/DiagnosticId.cs";

const BASELINE: &str = "namespace Philips.CodeAnalysis.Common
{
\tpublic enum DiagnosticId
\t{
\t\tNone = 0,
\t\tAvoidEmptyCatch = 2000,
\t\tAvoidGotoStatement = 2001, // flagged
\t\t// Retired = 2158,
\t\tPreferReadOnly = 2159,
\t}
}
";

fn nextid(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nextid"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn write_baseline(root: &Path) {
    let path = root.join(ARTIFACT);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, BASELINE).unwrap();
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_offline_next_uses_baseline_only() {
    let dir = tempfile::tempdir().unwrap();
    write_baseline(dir.path());
    let root = dir.path().to_str().unwrap();

    let output = nextid(&["next", "--offline", "--repo-root", root, "--json"]);

    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["next_id"], 2160);
    assert_eq!(report["formatted_id"], "PH2160");
    assert_eq!(report["baseline_max_id"], 2159);
    assert_eq!(report["total_open_proposals"], 0);
    assert_eq!(report["all_used_ids_count"], 3);
}

#[test]
fn test_missing_baseline_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    let output = nextid(&["next", "--offline", "--repo-root", root, "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let report = stdout_json(&output);
    assert_eq!(report["status"], "error");
    assert!(report.get("next_id").is_none());
    assert_eq!(report["formatted_id"], "");
}

#[test]
fn test_prefix_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_baseline(dir.path());
    let config = dir.path().join("nextid.toml");
    std::fs::write(
        &config,
        format!("repo_root = {:?}\nprefix = \"XY\"\n", dir.path().display().to_string()),
    )
    .unwrap();

    let output = nextid(&[
        "next",
        "--offline",
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("XY2160"), "{text}");
}

#[test]
fn test_parse_lists_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    write_baseline(dir.path());
    let file = dir.path().join(ARTIFACT);

    let output = nextid(&["parse", file.to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let summary = stdout_json(&output);
    assert_eq!(summary["count"], 3);
    assert_eq!(summary["min"], 2000);
    assert_eq!(summary["max"], 2159);
}

#[test]
fn test_parse_missing_file_fails() {
    let output = nextid(&["parse", "/nonexistent/DiagnosticId.cs"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
