//! Headless runner output tests

use std::process::Command;

fn run_battle(format: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_battle_runner"))
        .args(["--knights", "4", "--seed", "7", "--max-ticks", "3000", "--format", format])
        .output()
        .expect("failed to launch battle_runner")
}

#[test]
fn test_json_summary_is_only_stdout() {
    let output = run_battle("json");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be a single JSON document");
    assert_eq!(summary["seed"], 7);
    assert!(summary["ticks"].as_u64().unwrap() > 0);

    // Logs still go somewhere
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("battle started"));
}

#[test]
fn test_verbose_events_stay_off_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_battle_runner"))
        .args(["--knights", "4", "--seed", "7", "--max-ticks", "500", "--verbose"])
        .output()
        .expect("failed to launch battle_runner");
    assert!(output.status.success());
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_ok());
}
