use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_scrapfall")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("scrapfall-{name}-{stamp}"));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: scrapfall"));
}

#[test]
fn simulate_command_dispatches_and_emits_a_replay() {
    let output = Command::new(bin())
        .args(["simulate", "vanguard", "1", "7"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("simulate should emit json");
    assert_eq!(payload["pilot_id"].as_str(), Some("vanguard"));
    assert!(payload["outcome"].is_string());
    assert!(payload["final_stats"]["ticks"].is_number());
    assert!(payload["actions"].is_array());
}

#[test]
fn simulate_command_rejects_unknown_pilots() {
    let output = Command::new(bin())
        .args(["simulate", "nobody"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown pilot"));
}

#[test]
fn batch_command_emits_an_aggregate_summary() {
    let output = Command::new(bin())
        .args(["batch", "vanguard", "1", "7", "balanced", "8"])
        .output()
        .expect("batch should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("batch should emit json");
    assert_eq!(payload["iterations"].as_u64(), Some(8));
    assert!(payload["win_rate"].is_number());
}

#[test]
fn validate_command_passes_on_the_builtin_tables() {
    let empty = unique_temp_dir("valid");
    let output = Command::new(bin())
        .arg("validate")
        .env("SCRAPFALL_DATA_DIR", &empty)
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));

    let _ = fs::remove_dir_all(empty);
}

#[test]
fn validate_command_returns_non_zero_on_invalid_data() {
    let dir = unique_temp_dir("invalid-pilots");
    let pilot = "{\"id\":\"dup\",\"name\":\"Dup\",\"archetype\":\"vanguard\",\
\"base_hp\":100,\"base_speed\":10.0,\"base_damage\":10,\"abilities\":[]}";
    fs::write(dir.join("pilots.json"), format!("[{pilot},{pilot}]"))
        .expect("fixture should be written");

    let output = Command::new(bin())
        .arg("validate")
        .env("SCRAPFALL_DATA_DIR", &dir)
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));

    let _ = fs::remove_dir_all(dir);
}
