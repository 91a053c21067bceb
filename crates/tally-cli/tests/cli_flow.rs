//! End-to-end tests driving the `tally` binary.
//!
//! Tests the full pipeline: import rows → totals (text and JSON).

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tally_core::{LogDetail, TotalCalc};
use tempfile::TempDir;

fn tally_binary() -> String {
    env!("CARGO_BIN_EXE_tally").to_string()
}

/// Runs `tally` isolated from the user's config and environment.
fn run_tally(home: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(tally_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("TALLY_BY_TASK")
        .env_remove("TALLY_BY_COMMENT")
        .env_remove("TALLY_BY_RULES")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tally");

    let mut pipe = child.stdin.take().expect("stdin is piped");
    if let Some(input) = stdin {
        pipe.write_all(input.as_bytes()).expect("failed to write stdin");
    }
    drop(pipe);

    child.wait_with_output().expect("failed to wait for tally")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "tally failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

const RULES_TOML: &str = r#"
[group]
groupByRules = true

[[rules]]
field = "comment"
values = ["bugfix"]
key = "r1"
name = "Bugfix"
"#;

const LOGS_JSON: &str = r#"[
    {"issue": "A", "comment": "bugfix: x", "time": 30, "deps": [], "key": "k1"},
    {"issue": "B", "comment": "feature", "time": 10, "deps": [], "key": "k2"}
]"#;

#[test]
fn test_totals_json_from_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("tally.toml");
    let logs = temp.path().join("logs.json");
    std::fs::write(&config, RULES_TOML).unwrap();
    std::fs::write(&logs, LOGS_JSON).unwrap();

    let output = run_tally(
        temp.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "totals",
            "--json",
            logs.to_str().unwrap(),
        ],
        None,
    );
    assert_success(&output);

    let calc: TotalCalc = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(calc.time, 40);
    let keys: Vec<_> = calc.logs.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, ["r1", "unmatched"]);
    assert!((calc.logs[0].percent - 75.0).abs() < 1e-9);
    assert!((calc.logs[1].percent - 25.0).abs() < 1e-9);
}

#[test]
fn test_totals_text_from_stdin() {
    let temp = TempDir::new().unwrap();

    let output = run_tally(temp.path(), &["totals", "--by-task"], Some(LOGS_JSON));
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("TOTALS\n"), "{stdout}");
    assert!(stdout.contains("Total: 40m in 2 groups (2 logs)"), "{stdout}");
}

#[test]
fn test_flags_override_config() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("tally.toml");
    std::fs::write(&config, RULES_TOML).unwrap();

    let output = run_tally(
        temp.path(),
        &["-c", config.to_str().unwrap(), "totals", "--json", "--by-task"],
        Some(LOGS_JSON),
    );
    assert_success(&output);

    let calc: TotalCalc = serde_json::from_slice(&output.stdout).unwrap();
    let keys: Vec<_> = calc.logs.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, ["A", "B"]);
}

#[test]
fn test_sort_orders_by_time() {
    let temp = TempDir::new().unwrap();
    let logs = r#"[
        {"issue": "small", "comment": "", "time": 5, "key": "k1"},
        {"issue": "big", "comment": "", "time": 50, "key": "k2"}
    ]"#;

    let output = run_tally(
        temp.path(),
        &["totals", "--json", "--by-task", "--sort"],
        Some(logs),
    );
    assert_success(&output);

    let calc: TotalCalc = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(calc.logs[0].key, "big");
    assert_eq!(calc.logs[1].key, "small");
}

#[test]
fn test_import_then_totals() {
    let temp = TempDir::new().unwrap();
    let rows = r#"[
        ["PRJ-1", "review", "1h 30m"],
        ["PRJ-2", "docs", "0:30"]
    ]"#;

    let imported = run_tally(temp.path(), &["import"], Some(rows));
    assert_success(&imported);

    let logs: Vec<LogDetail> = serde_json::from_slice(&imported.stdout).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].time, 90);
    assert_eq!(logs[1].time, 30);

    let totals = run_tally(
        temp.path(),
        &["totals", "--json", "--by-task"],
        Some(&String::from_utf8_lossy(&imported.stdout)),
    );
    assert_success(&totals);

    let calc: TotalCalc = serde_json::from_slice(&totals.stdout).unwrap();
    assert_eq!(calc.time, 120);
    assert!((calc.logs[0].percent - 75.0).abs() < 1e-9);
}

#[test]
fn test_import_reads_rows_per_line() {
    let temp = TempDir::new().unwrap();
    let rows = "[\"PRJ-1\", \"review\", \"45m\"]\n[\"PRJ-2\", \"docs\", \"15\"]\n";

    let imported = run_tally(temp.path(), &["import"], Some(rows));
    assert_success(&imported);

    let logs: Vec<LogDetail> = serde_json::from_slice(&imported.stdout).unwrap();
    let times: Vec<_> = logs.iter().map(|l| l.time).collect();
    assert_eq!(times, [45, 15]);
}

#[test]
fn test_totals_with_keyless_deps() {
    let temp = TempDir::new().unwrap();
    let logs = r#"[{"issue": "A", "comment": "x", "time": 10, "key": "k1",
                    "deps": [{"issue": "A", "comment": "d", "time": 5}]}]"#;

    let output = run_tally(temp.path(), &["totals", "--json", "--by-task"], Some(logs));
    assert_success(&output);

    let calc: TotalCalc = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(calc.time, 15);
    assert_eq!(calc.logs[0].time, 15);
}

#[test]
fn test_cyclic_dependency_fails() {
    let temp = TempDir::new().unwrap();
    let logs = r#"[{"issue": "A", "comment": "", "time": 1, "key": "k1",
                    "deps": [{"issue": "A", "comment": "", "time": 1, "key": "k1"}]}]"#;

    let output = run_tally(temp.path(), &["totals"], Some(logs));
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cyclic dependency through log k1"), "{stderr}");
}

#[test]
fn test_invalid_rule_field_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("tally.toml");
    std::fs::write(
        &config,
        "[[rules]]\nfield = \"author\"\nvalues = [\"me\"]\nkey = \"mine\"\n",
    )
    .unwrap();

    let output = run_tally(
        temp.path(),
        &["-c", config.to_str().unwrap(), "rules"],
        None,
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"), "{stderr}");
}
