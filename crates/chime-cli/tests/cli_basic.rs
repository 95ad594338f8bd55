//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. All
//! runs use CHIME_ENV=dev so the production data directory is left
//! alone.

use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "chime-cli", "--"])
        .args(args)
        .env("CHIME_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_timer_status() {
    let (code, stdout, _) = run_cli(&["timer", "status"]);
    assert_eq!(code, 0, "timer status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status is not valid JSON");
    assert!(parsed.get("remaining_seconds").is_some());
    assert!(parsed.get("timer_purpose").is_some());
}

#[test]
fn test_timer_preset() {
    let (code, stdout, _) = run_cli(&["timer", "preset", "10"]);
    assert_eq!(code, 0, "timer preset failed");
    assert!(stdout.contains("10 minutes"));
}

#[test]
fn test_timer_preset_rejects_zero() {
    let (code, _, _) = run_cli(&["timer", "preset", "0"]);
    assert_ne!(code, 0, "zero-minute preset should be rejected");
}

#[test]
fn test_timer_set_url_token() {
    let (code, stdout, _) = run_cli(&["timer", "set", "730"]);
    assert_eq!(code, 0, "timer set failed");
    assert!(stdout.contains("07:30"));
}

#[test]
fn test_timer_set_invalid_token() {
    let (code, _, stderr) = run_cli(&["timer", "set", "123456"]);
    assert_ne!(code, 0, "six-digit token should be rejected");
    assert!(stderr.contains("error"));
}

#[test]
fn test_timer_purpose() {
    let (code, stdout, _) = run_cli(&["timer", "purpose", "school"]);
    assert_eq!(code, 0, "timer purpose failed");
    assert!(stdout.contains("school"));
}

#[test]
fn test_timer_purpose_rejects_blank() {
    let (code, _, _) = run_cli(&["timer", "purpose", "   "]);
    assert_ne!(code, 0, "blank purpose should be rejected");
}

#[test]
fn test_timer_sound_toggle() {
    let (code, stdout, _) = run_cli(&["timer", "sound"]);
    assert_eq!(code, 0, "timer sound failed");
    assert!(stdout.contains("sound on") || stdout.contains("sound off"));
}

#[test]
fn test_timer_recent() {
    let _ = run_cli(&["timer", "set", "915"]);
    let (code, stdout, _) = run_cli(&["timer", "recent"]);
    assert_eq!(code, 0, "timer recent failed");
    assert!(stdout.contains("09:15"));
}

#[test]
fn test_timer_reset() {
    let (code, stdout, _) = run_cli(&["timer", "reset"]);
    assert_eq!(code, 0, "timer reset failed");
    assert!(stdout.contains("reset"));
}

#[test]
fn test_share_print() {
    let (code, stdout, _) = run_cli(&["share", "print"]);
    assert_eq!(code, 0, "share print failed");
    // /{purpose}/{HHMM}; tests run in parallel so the purpose itself
    // is not asserted.
    let path = stdout.trim();
    assert!(path.starts_with('/'), "unexpected share path: {path}");
    assert_eq!(path.split('/').filter(|s| !s.is_empty()).count(), 2);
}

#[test]
fn test_share_link() {
    let (code, stdout, _) = run_cli(&["share", "link", "/lunch/1230"]);
    assert_eq!(code, 0, "share link failed");
    assert!(stdout.contains("lunch"));
    assert!(stdout.contains("12:30"));
}

#[test]
fn test_config_show() {
    let (code, stdout, _) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("[timer]"));
}

#[test]
fn test_config_get() {
    let (code, stdout, _) = run_cli(&["config", "get", "timer.warning_seconds"]);
    assert_eq!(code, 0, "config get failed");
    assert!(stdout.trim().parse::<u64>().is_ok());
}

#[test]
fn test_config_get_unknown_key() {
    let (code, _, _) = run_cli(&["config", "get", "nope.nothing"]);
    assert_ne!(code, 0, "unknown key should be rejected");
}
