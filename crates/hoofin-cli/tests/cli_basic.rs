//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway data
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against the given data directory and return
/// (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "hoofin-cli", "--"])
        .args(args)
        .env("HOOFIN_DATA_DIR", data_dir)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// A two-interval, one-week program with 3-second intervals.
fn seed_program(data_dir: &Path) {
    let programs = data_dir.join("programs");
    std::fs::create_dir_all(&programs).unwrap();
    std::fs::write(
        programs.join("walk.json"),
        r#"{
            "name": "Walk to Run",
            "description": "Short test plan",
            "weeks": [
                {
                    "sessions": [
                        { "intervals": [
                            { "type": "Walk", "duration": 0.05 },
                            { "type": "Jog", "duration": 0.05 }
                        ] },
                        { "intervals": [ { "type": "Walk", "duration": 0.05 } ] }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();
}

#[test]
fn test_config_show() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("sound"));
    assert!(stdout.contains("keep_screen_on"));
}

#[test]
fn test_config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "sound.enabled"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "true");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "sound.enabled", "false"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "sound.enabled"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "sound.missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_position_show_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["position", "show"]);
    assert_eq!(code, 0, "position show failed");
    assert!(stdout.contains("no saved position"));

    let (stdout, _, code) = run_cli(dir.path(), &["position", "clear"]);
    assert_eq!(code, 0, "position clear failed");
    assert!(stdout.contains("position cleared"));
}

#[test]
fn test_program_list() {
    let dir = tempfile::tempdir().unwrap();
    seed_program(dir.path());
    let (stdout, _, code) = run_cli(dir.path(), &["program", "list"]);
    assert_eq!(code, 0, "program list failed");
    assert!(stdout.contains("Walk to Run"));
}

#[test]
fn test_program_show() {
    let dir = tempfile::tempdir().unwrap();
    seed_program(dir.path());
    let (stdout, _, code) = run_cli(dir.path(), &["program", "show", "Walk to Run"]);
    assert_eq!(code, 0, "program show failed");
    assert!(stdout.contains("week 1"));
    assert!(stdout.contains("Jog"));
}

#[test]
fn test_workout_start_without_program_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["workout", "start"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no program selected"));
}

#[test]
fn test_workout_status_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["workout", "status"]);
    assert_eq!(code, 0, "workout status failed");
    assert!(stdout.contains("no active workout"));
}

#[test]
fn test_workout_session_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    seed_program(dir.path());

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["workout", "start", "--program", "Walk to Run"],
    );
    assert_eq!(code, 0, "workout start failed");
    assert!(stdout.contains("\"running\": true"));

    // The first interval is 3 seconds; the third tick crosses the boundary.
    let (stdout, _, code) = run_cli(dir.path(), &["workout", "tick", "3"]);
    assert_eq!(code, 0, "workout tick failed");
    assert!(stdout.contains("IntervalAdvanced"));

    let (stdout, _, code) = run_cli(dir.path(), &["workout", "pause"]);
    assert_eq!(code, 0, "workout pause failed");
    assert!(stdout.contains("\"running\": false"));

    let (stdout, _, code) = run_cli(dir.path(), &["workout", "complete"]);
    assert_eq!(code, 0, "workout complete failed");
    assert!(stdout.contains("SessionCompleted"));

    let (stdout, _, code) = run_cli(dir.path(), &["position", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"completed\": true"));
}

#[test]
fn test_workout_skip_session() {
    let dir = tempfile::tempdir().unwrap();
    seed_program(dir.path());

    let (_, _, code) = run_cli(
        dir.path(),
        &["workout", "start", "--program", "Walk to Run"],
    );
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(dir.path(), &["workout", "skip-session"]);
    assert_eq!(code, 0, "workout skip-session failed");
    assert!(stdout.contains("PositionChanged"));

    // Already at the last session of the only week.
    let (stdout, _, code) = run_cli(dir.path(), &["workout", "skip-session"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("last session"));
}
