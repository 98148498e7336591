//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary HOME and store file and
//! verify outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

struct Env {
    home: TempDir,
    store: PathBuf,
}

impl Env {
    fn new() -> Self {
        let home = tempfile::tempdir().expect("tempdir");
        let store = home.path().join("schedule.json");
        Self { home, store }
    }

    fn seeded() -> Self {
        let env = Self::new();
        std::fs::write(
            &env.store,
            r#"{
                "days": {
                    "2025-03-01": [
                        {"scheduleEntryId": "e1", "taskRef": "write-report", "startTime": "09:00", "durationMinutes": 60},
                        {"scheduleEntryId": "e2", "taskRef": "review-pr", "startTime": "10:00", "durationMinutes": 30},
                        {"scheduleEntryId": "e3", "taskRef": "someday", "startTime": null}
                    ]
                }
            }"#,
        )
        .expect("seed store");
        env
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        run_cli(self.home.path(), &self.store, args)
    }
}

fn run_cli(home: &Path, store: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_daycascade"))
        .env("HOME", home)
        .env_remove("DAYCASCADE_ENV")
        .env_remove("DAYCASCADE_LOG")
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_place_on_empty_day() {
    let env = Env::new();
    let (stdout, stderr, code) = env.run(&["place", "--date", "2025-03-01", "--task", "t1", "--offset", "23"]);
    assert_eq!(code, 0, "place failed: {stderr}");

    let batch = parse_json(&stdout);
    assert_eq!(batch["dateKey"], "2025-03-01");
    assert_eq!(batch["kind"], "new");
    assert_eq!(batch["activePlacement"]["startTime"], "09:30");
    assert_eq!(batch["cascadingUpdates"].as_array().unwrap().len(), 0);
}

#[test]
fn test_place_cascades_and_applies() {
    let env = Env::seeded();
    let (stdout, stderr, code) = env.run(&[
        "place", "--date", "2025-03-01", "--task", "standup", "--offset", "0", "--duration", "90", "--apply",
    ]);
    assert_eq!(code, 0, "place failed: {stderr}");

    let batch = parse_json(&stdout);
    let updates = batch["cascadingUpdates"].as_array().unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["scheduleEntryId"], "e1");
    assert_eq!(updates[0]["startTime"], "10:30");
    assert_eq!(updates[1]["scheduleEntryId"], "e2");
    assert_eq!(updates[1]["startTime"], "11:30");

    let (stdout, _, code) = env.run(&["day", "show", "--date", "2025-03-01", "--json"]);
    assert_eq!(code, 0);
    let day = parse_json(&stdout);
    let entries = day["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries
        .iter()
        .any(|e| e["taskRef"] == "standup" && e["startTime"] == "09:00"));
}

#[test]
fn test_move_requires_entry() {
    let env = Env::seeded();
    let (_, stderr, code) = env.run(&[
        "place", "--date", "2025-03-01", "--kind", "move", "--task", "review-pr", "--offset", "0",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("requires a schedule entry id"), "stderr: {stderr}");
}

#[test]
fn test_drop_above_timeline_is_rejected() {
    let env = Env::seeded();
    let (stdout, _, code) = env.run(&["place", "--date", "2025-03-01", "--task", "t1", "--offset=-600"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("rejected:"), "stdout: {stdout}");
}

#[test]
fn test_next_slot() {
    let env = Env::seeded();
    let (stdout, _, code) = env.run(&["day", "next-slot", "--date", "2025-03-01"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10:30");

    let (stdout, _, _) = env.run(&["day", "next-slot", "--date", "2025-03-02"]);
    assert_eq!(stdout.trim(), "09:00");
}

#[test]
fn test_show_lists_day_in_order() {
    let env = Env::seeded();
    let (stdout, _, code) = env.run(&["day", "show", "--date", "2025-03-01"]);
    assert_eq!(code, 0);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("09:00") && lines[0].contains("9:00 AM") && lines[0].contains("1 hr"));
    assert!(lines[1].contains("review-pr"));
    assert!(lines[2].contains("--:--") && lines[2].contains("someday"));
}

#[test]
fn test_resize_and_unschedule() {
    let env = Env::seeded();
    let (stdout, _, code) = env.run(&[
        "day", "resize", "--date", "2025-03-01", "--entry", "e2", "--height", "44", "--apply",
    ]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["durationMinutes"], 45);

    let (stdout, _, code) = env.run(&["day", "unschedule", "--date", "2025-03-01", "--entry", "e2"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("unscheduled e2"));

    let (_, _, code) = env.run(&["day", "unschedule", "--date", "2025-03-01", "--entry", "e2"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_get_and_set() {
    let env = Env::new();
    let (stdout, _, code) = env.run(&["config", "get", "timeline.view_start_hour"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "9");

    let (_, _, code) = env.run(&["config", "set", "timeline.view_start_hour", "8"]);
    assert_eq!(code, 0);

    // With the view starting at 08:00 an offset of 0 lands at 08:00.
    let (stdout, _, code) = env.run(&["place", "--date", "2025-03-01", "--task", "t1", "--offset", "0"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["activePlacement"]["startTime"], "08:00");

    let (_, _, code) = env.run(&["config", "set", "placement.overflow", "wrap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_huge_offset_lands_on_last_slot_and_nan_is_refused() {
    let env = Env::new();
    let (stdout, stderr, code) = env.run(&["place", "--date", "2025-03-01", "--task", "t1", "--offset", "1e12"]);
    assert_eq!(code, 0, "place failed: {stderr}");
    assert_eq!(parse_json(&stdout)["activePlacement"]["startTime"], "23:45");

    let (_, stderr, code) = env.run(&["place", "--date", "2025-03-01", "--task", "t1", "--offset", "NaN"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("finite"), "stderr: {stderr}");
}

#[test]
fn test_placing_scheduled_task_again_moves_it() {
    let env = Env::seeded();
    let (stdout, stderr, code) = env.run(&[
        "place", "--date", "2025-03-01", "--task", "review-pr", "--offset", "120", "--apply",
    ]);
    assert_eq!(code, 0, "place failed: {stderr}");
    let batch = parse_json(&stdout);
    assert_eq!(batch["kind"], "move");
    assert_eq!(batch["activePlacement"]["scheduleEntryId"], "e2");

    let (stdout, _, _) = env.run(&["day", "show", "--date", "2025-03-01", "--json"]);
    let day = parse_json(&stdout);
    let rows: Vec<_> = day["entries"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["taskRef"] == "review-pr")
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["startTime"], "11:00");
}

#[test]
fn test_config_list_check_and_unknown_key() {
    let env = Env::new();
    let (stdout, _, code) = env.run(&["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.lines().any(|l| l == "placement.overflow = allow"), "stdout: {stdout}");
    assert!(stdout.lines().any(|l| l == "timeline.view_end_hour = 24"), "stdout: {stdout}");

    let (stdout, _, code) = env.run(&["config", "check"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("view: 09:00-24:00"), "stdout: {stdout}");

    let (_, stderr, code) = env.run(&["config", "get", "timeline.zoom"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key"), "stderr: {stderr}");

    let config_path = env.home.path().join(".config/daycascade/config.toml");
    std::fs::write(&config_path, "[timeline]\nview_start_hour = 20\nview_end_hour = 10\n").unwrap();
    let (_, stderr, code) = env.run(&["config", "check"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("view hours"), "stderr: {stderr}");
}
