//! End-to-end tests for the `exectime` binary.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn exectime() -> Command {
    let mut cmd = Command::cargo_bin("exectime").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_run_prints_one_line_per_command() {
    let output = exectime()
        .args(["run", "true", "echo hi"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2, "{lines:?}");
    let pattern = predicate::str::is_match(r"^\[Execution time: \d+ms\]$").unwrap();
    for line in &lines {
        assert!(pattern.eval(line.as_str()), "{line}");
    }
}

#[test]
fn test_run_logs_return_value() {
    exectime()
        .args(["run", "--log-return", "echo hello"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[Execution time: \d+ms\] \[Return: hello\]\n$").unwrap());
}

#[test]
fn test_failures_do_not_stop_batch() {
    let output = exectime()
        .args([
            "run",
            "--total",
            "echo first",
            "echo oops >&2; exit 3",
            "exit 4",
            "",
            "echo last",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 6, "{lines:?}");
    assert!(lines[0].starts_with("[Execution time: "));
    assert_eq!(lines[1], "[Error message: oops]");
    assert_eq!(lines[2], "[Error message: exit status: 4]");
    assert_eq!(lines[3], "[Error message: Null operation]");
    assert!(lines[4].starts_with("[Execution time: "));
    assert!(lines[5].starts_with("[Total execution time: "));
}

#[test]
fn test_max_level_and_seconds() {
    exectime()
        .args(["run", "--level", "max", "--time-format", "s", "true"])
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(
                r"^\[Execution time: 0s\] \[Start time: \d+\] \[End time: \d+\]\n$",
            )
            .unwrap(),
        );
}

#[test]
fn test_no_log_time_keeps_total_only() {
    exectime()
        .args(["run", "--no-log-time", "--total", "true", "true"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[Total execution time: \d+ms\]\n$").unwrap());
}

#[test]
fn test_unsupported_level_is_rejected_before_running() {
    let tmp = TempDir::new().unwrap();
    let marker = tmp.path().join("ran");

    exectime()
        .args(["run", "--level", "loud"])
        .arg(format!("touch {}", marker.display()))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unsupported log level: loud"));
    assert!(!marker.exists());
}

#[test]
fn test_config_file_with_flag_override() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("exectime.yaml");
    std::fs::write(&path, "log_return: true\ntime_format: ns\n").unwrap();

    exectime()
        .args(["run", "--config"])
        .arg(&path)
        .args(["--time-format", "ms", "echo 42"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[Execution time: \d+ms\] \[Return: 42\]\n$").unwrap());
}

#[test]
fn test_config_file_with_bad_level_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("exectime.json");
    std::fs::write(&path, r#"{"log_level": "huge"}"#).unwrap();

    exectime()
        .args(["run", "--config"])
        .arg(&path)
        .arg("true")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unsupported log level: huge"));
}

#[test]
fn test_missing_config_file_fails() {
    exectime()
        .args(["run", "--config", "/nonexistent/exectime.yaml", "true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_init_then_show() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("exectime.json");

    exectime()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));

    // A second init without --force must not clobber the file.
    exectime()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let output = exectime()
        .args(["config", "show", "--format", "json", "--total", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["log_total_time"], true);
    assert_eq!(shown["log_time"], true);
    assert_eq!(shown["time_format"], "milliseconds");
    assert_eq!(shown["log_level"], "min");
}

#[test]
fn test_config_show_table() {
    exectime()
        .args(["config", "show", "--level", "max"])
        .assert()
        .success()
        .stdout(predicate::str::contains("log_level").and(predicate::str::contains("max")));
}
