//! End-to-end runs of the trafficlight binary

use crate::common::write_config;
use std::process::Command;

fn trafficlight() -> Command {
    Command::new(env!("CARGO_BIN_EXE_trafficlight"))
}

#[test]
fn test_help_lists_simulation_flags() {
    let output = trafficlight().arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for flag in ["--lights", "--vehicles", "--min-cycle-ms", "--max-cycle-ms", "--pop-order"] {
        assert!(stdout.contains(flag), "help is missing {}", flag);
    }
}

#[test]
fn test_version_flag() {
    let output = trafficlight().arg("--version").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_config_file_exits_with_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = trafficlight()
        .arg("--config-file")
        .arg(&missing)
        .arg("--no-color")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("FATAL"));
}

#[test]
fn test_invalid_interval_exits_with_fatal_error() {
    let config = write_config("min-cycle-ms = 500\nmax-cycle-ms = 100\n");

    let output = trafficlight()
        .arg("--config-file")
        .arg(config.path())
        .arg("--no-color")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr.contains("FATAL: maximum cycle must be greater than minimum cycle"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_short_run_reports_and_exits_cleanly() {
    let config = write_config("lights = 2\nvehicles = 2\n");

    let output = trafficlight()
        .arg("--config-file")
        .arg(config.path())
        .args(["--min-cycle-ms", "10", "--max-cycle-ms", "20"])
        .args(["--duration", "1", "--report-ms", "100", "--no-color"])
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("intersection: light-"), "stderr: {}", stderr);
    assert!(stderr.contains("Simulation finished"), "stderr: {}", stderr);
}

#[test]
fn test_unbounded_duration_exits_with_fatal_error() {
    let config = write_config("lights = 1\n");

    let output = trafficlight()
        .arg("--config-file")
        .arg(config.path())
        .args(["--duration", &u64::MAX.to_string(), "--no-color"])
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("FATAL: run time of"), "stderr: {}", stderr);
}
