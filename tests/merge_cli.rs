//! E2E tests for the merge, inspect, summary and schema commands

use std::process::Command;

fn cgc(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Merging two statements keeps active rows in file order with derived columns
#[test]
fn merge_two_statements_csv() {
    let output = cgc(&[
        "merge",
        "tests/data/equity_fy24.csv",
        "tests/data/mf_fy24.csv",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6, "header plus five rows: {}", stdout);
    assert!(lines[0].ends_with("Data From,Sell - Cost,31 July 2024"));

    assert!(lines[1].starts_with("ACME LIMITED (ACME),2024-08-15"));
    assert!(lines[1].ends_with("equity_fy24.csv,265.50,After 31 July 2024"));
    assert!(lines[2].ends_with("equity_fy24.csv,1500.00,Before 31 July 2024"));
    // Unreported sale value leaves the difference empty
    assert!(lines[3].ends_with("equity_fy24.csv,,After 31 July 2024"));
    assert!(lines[4].ends_with("mf_fy24.csv,5300.00,After 31 July 2024"));
    assert!(lines[5].ends_with("mf_fy24.csv,10.00,Unknown Date"));

    assert!(!stdout.contains("GAMMA"));
}

/// Missing files are skipped with a warning and do not fail the merge
#[test]
fn merge_skips_missing_file() {
    let output = cgc(&[
        "merge",
        "tests/data/does_not_exist.csv",
        "tests/data/mf_fy24.csv",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert_eq!(stdout.lines().count(), 3);
    assert!(stderr.contains("does_not_exist.csv does not exist"));
}

/// Only missing files gives a header-only table, not an error
#[test]
fn merge_only_missing_files_is_empty() {
    let output = cgc(&["merge", "tests/data/does_not_exist.csv"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert_eq!(stdout.lines().count(), 1);
    assert!(stderr.contains("No valid CSV files found to combine"));
}

/// A bad cost of acquisition fails the whole merge without output rows
#[test]
fn merge_bad_cost_fails() {
    let output = cgc(&[
        "merge",
        "tests/data/equity_fy24.csv",
        "tests/data/bad_cost.csv",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());

    assert!(stdout.is_empty());
    assert!(stderr.contains("bad_cost.csv, line 3"));
    assert!(stderr.contains("unknown"));
}

/// A file without the expected columns fails the whole merge
#[test]
fn merge_wrong_layout_fails() {
    let output = cgc(&["merge", "tests/data/wrong_layout.csv"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("missing required column(s)"));
    assert!(stderr.contains("Cost of Acquisition"));
}

/// JSON output keys rows by column name
#[test]
fn merge_json_output() {
    let output = cgc(&["merge", "tests/data/mf_fy24.csv", "--format", "json"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("\"Data From\": \"mf_fy24.csv\""));
    assert!(stdout.contains("\"31 July 2024\": \"Unknown Date\""));
}

/// Inspect counts rows by position, header line included
#[test]
fn inspect_json() {
    let output = cgc(&["inspect", "tests/data/equity_fy24.csv", "--json"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("\"rows\": 5"));
    assert!(stdout.contains("\"columns\": 7"));
    assert!(stdout.contains("\"sha256\""));
}

/// Inspect of an unreadable file reports the error
#[test]
fn inspect_missing_file() {
    let output = cgc(&["inspect", "tests/data/does_not_exist.csv", "--json"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!output.status.success());
    assert!(stdout.contains("\"error\""));
}

/// Summary groups gains around the cutoff
#[test]
fn summary_json() {
    let output = cgc(&["summary", "--dir", "tests/data", "--json"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    // tests/data also holds the malformed fixtures
    assert!(!output.status.success());
    assert!(stderr.contains("Error combining CSV files"));

    let output = cgc(&[
        "summary",
        "tests/data/equity_fy24.csv",
        "tests/data/mf_fy24.csv",
        "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("\"period\": \"Before 31 July 2024\""));
    assert!(stdout.contains("\"gain\": \"7075.50\""));
}

/// Schema header matches the merged output columns
#[test]
fn schema_csv_header() {
    let output = cgc(&["schema", "csv-header"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("Security Name (Security Code),Date of Sale/Transfer"));
    assert!(stdout.trim_end().ends_with("Data From,Sell - Cost,31 July 2024"));
}

/// No input at all is a usage error
#[test]
fn merge_without_files_fails() {
    let output = cgc(&["merge"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Please select CSV files"));
}

/// Schema config output shows the override file layout and its defaults
#[test]
fn schema_config_lists_defaults() {
    let output = cgc(&["schema", "schema-config"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("\"cost_of_acquisition\""));
    assert!(stdout.contains("\"active_status\": \"Active\""));
}
