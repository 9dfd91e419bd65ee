#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn actionq(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("actionq").unwrap();
    cmd.current_dir(dir.path()).env_remove("ACTIONQ_CONFIG");
    cmd
}

fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenarios")
        .join(name)
}

fn start_order(trace: &serde_json::Value) -> Vec<String> {
    trace["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["kind"] == "started")
        .map(|e| e["label"].as_str().unwrap().to_string())
        .collect()
}

fn run_json(dir: &TempDir, name: &str) -> serde_json::Value {
    let output = actionq(dir)
        .args(["run", "--json"])
        .arg(scenario(name))
        .output()
        .unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// actionq run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_trace_table() {
    let dir = TempDir::new().unwrap();
    actionq(&dir)
        .arg("run")
        .arg(scenario("suspension-reattachment.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("scenario: suspension-reattachment"))
        .stdout(predicate::str::contains("AT_MS"))
        .stdout(predicate::str::contains(
            "order: first → third → sixth → seventh",
        ))
        .stdout(predicate::str::contains("stalled: no"));
}

#[test]
fn run_json_nested_deferred_is_depth_first() {
    let dir = TempDir::new().unwrap();
    let trace = run_json(&dir, "nested-deferred.yaml");
    assert_eq!(start_order(&trace), ["a", "a1", "a2", "b", "b1", "c"]);
    assert_eq!(trace["stalled"], false);
}

#[test]
fn run_json_deep_suspension_order() {
    let dir = TempDir::new().unwrap();
    let trace = run_json(&dir, "deep-suspension.yaml");
    assert_eq!(
        start_order(&trace),
        ["one-1", "two-2", "three", "one-6", "two-7", "one-8", "two-9"]
    );
}

#[test]
fn run_close_reports_dropped_actions() {
    let dir = TempDir::new().unwrap();
    let trace = run_json(&dir, "close.yaml");
    let dropped: Vec<&str> = trace["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["kind"] == "dropped")
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(dropped, ["late-child", "too-late"]);
    assert_eq!(start_order(&trace), ["slow", "queued"]);
}

#[test]
fn run_stalled_scenario_exits_2() {
    let dir = TempDir::new().unwrap();
    actionq(&dir)
        .arg("run")
        .arg(scenario("stall.yaml"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("stalled: yes (1 pending)"))
        .stderr(predicate::str::contains("sequencer stalled"));
}

#[test]
fn run_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    actionq(&dir)
        .args(["run", "does-not-exist.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load scenario"));
}

// ---------------------------------------------------------------------------
// actionq check
// ---------------------------------------------------------------------------

#[test]
fn check_accepts_bundled_scenarios() {
    let dir = TempDir::new().unwrap();
    for name in [
        "nested-deferred.yaml",
        "suspension-reattachment.yaml",
        "deep-suspension.yaml",
        "close.yaml",
        "stall.yaml",
    ] {
        actionq(&dir)
            .arg("check")
            .arg(scenario(name))
            .assert()
            .success()
            .stdout(predicate::str::starts_with("ok: "));
    }
}

#[test]
fn check_rejects_duplicate_labels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dup.yaml");
    std::fs::write(
        &path,
        "schedule:\n  - actions:\n      - label: x\n      - label: x\n",
    )
    .unwrap();

    actionq(&dir)
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate action label: x"));
}

#[test]
fn check_honours_config_delay_limit() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("actionq.yaml"), "max_delay_ms: 150\n").unwrap();

    actionq(&dir)
        .arg("check")
        .arg(scenario("suspension-reattachment.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds max_delay_ms=150"));
}

// ---------------------------------------------------------------------------
// actionq config
// ---------------------------------------------------------------------------

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();
    actionq(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in defaults"))
        .stdout(predicate::str::contains("virtual_time: true"));
}

#[test]
fn config_show_explicit_file_as_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    std::fs::write(&path, "trace_completions: false\n").unwrap();

    let output = actionq(&dir)
        .args(["config", "show", "--json", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["trace_completions"], false);
    assert_eq!(cfg["max_delay_ms"], 600_000);
}

#[test]
fn config_missing_explicit_file_fails() {
    let dir = TempDir::new().unwrap();
    actionq(&dir)
        .args(["config", "show", "--config", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
