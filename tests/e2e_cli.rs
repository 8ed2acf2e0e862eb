//! CLI end-to-end tests
//!
//! Tests for the transforge command-line interface. Conversions use a fake
//! tool script, so these run without ffmpeg installed.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;
use transforge::joblog::{LogLevel, LogRecord};

/// Get a command for the transforge binary
#[allow(deprecated)]
fn transforge_cmd() -> Command {
    Command::cargo_bin("transforge").unwrap()
}

fn job_log(stdout: &[u8]) -> Vec<LogRecord> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| LogRecord::parse(line).unwrap_or_else(|| panic!("malformed line: {line:?}")))
        .collect()
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = transforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = transforge_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("transforge"));
}

#[test]
fn test_cli_no_args_is_usage_error() {
    let mut cmd = transforge_cmd();
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_zero_threads_is_usage_error() {
    let mut cmd = transforge_cmd();
    cmd.args(["-o", "out", "-e", "mp4", "-j", "0", "a.mov"])
        .assert()
        .code(2);
}

#[test]
fn test_cli_missing_files_is_usage_error() {
    let mut cmd = transforge_cmd();
    cmd.args(["-o", "out", "-e", "mp4", "-j", "2"])
        .assert()
        .code(2);
}

#[test]
fn test_cli_unwritable_output_dir_is_setup_error() {
    let temp = tempdir().unwrap();
    let blocker = temp.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut cmd = transforge_cmd();
    cmd.arg("-o")
        .arg(blocker.join("out"))
        .args(["-e", "mp4", "-j", "1", "a.mov"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to create output directory"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_bad_config_is_setup_error() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("bad.toml");
    std::fs::write(&config, "[pool]\nthreads = 0\n").unwrap();

    let mut cmd = transforge_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["-o", "out", "-e", "mp4", "a.mov"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("pool.threads"));
}

#[test]
fn test_cli_missing_tool_fails_each_job_but_run_completes() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");

    let mut cmd = transforge_cmd();
    let output = cmd
        .arg("-o")
        .arg(&out)
        .args(["-e", "mp4", "-j", "2", "--actor", "ci"])
        .args(["--tool", "nonexistent_tool_xyz_12345"])
        .args(["a.mov", "b.mov"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(out.is_dir(), "output directory should be created before workers start");
    let records = job_log(&output.stdout);
    let errors: Vec<_> = records
        .iter()
        .filter(|r| r.level == LogLevel::Error)
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|r| r.message.ends_with("code=-1")));
    assert!(records.iter().all(|r| r.actor == "ci"));
}

#[test]
fn test_cli_check_tools_reports_missing_tool() {
    let mut cmd = transforge_cmd();
    cmd.args(["--check-tools", "--tool", "nonexistent_tool_xyz_12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ nonexistent_tool_xyz_12345"));
}

#[cfg(unix)]
mod with_fake_tool {
    use super::*;
    use crate::common::fake_tool;

    #[test]
    fn converts_every_file() {
        let temp = tempdir().unwrap();
        let tool = fake_tool(temp.path());
        let out = temp.path().join("nested/out");

        let mut cmd = transforge_cmd();
        let output = cmd
            .arg("-o")
            .arg(&out)
            .args(["-e", "mp4", "-j", "2", "--actor", "ci"])
            .arg("--tool")
            .arg(&tool)
            .args(["in/a.mov", "in/b.mov", "in/c.mov"])
            .output()
            .unwrap();

        assert!(output.status.success());
        for name in ["a.mp4", "b.mp4", "c.mp4"] {
            assert!(out.join(name).is_file(), "{name} was not produced");
        }

        let records = job_log(&output.stdout);
        let successes = records
            .iter()
            .filter(|r| r.message.starts_with("success: "))
            .count();
        assert_eq!(successes, 3);
        assert_eq!(
            records.last().unwrap().message,
            "done: 3 jobs, 3 succeeded, 0 failed"
        );
    }

    #[test]
    fn options_reach_the_tool_unmangled() {
        let temp = tempdir().unwrap();
        let tool = fake_tool(temp.path());
        let out = temp.path().join("out");

        let mut cmd = transforge_cmd();
        cmd.arg("-o")
            .arg(&out)
            .args(["-e", "mkv", "-j", "1"])
            .arg("--tool")
            .arg(&tool)
            .args(["--opt", "-c:v", "--opt", "copy; rm -rf /"])
            .arg("my clip.mov")
            .assert()
            .success();

        let written = std::fs::read_to_string(out.join("my clip.mkv")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "my clip.mov");
        assert_eq!(lines[1], "-c:v");
        assert_eq!(lines[2], "copy; rm -rf /");
    }

    #[test]
    fn failed_job_is_logged_and_others_continue() {
        let temp = tempdir().unwrap();
        let tool = fake_tool(temp.path());
        let out = temp.path().join("out");

        let mut cmd = transforge_cmd();
        let output = cmd
            .arg("-o")
            .arg(&out)
            .args(["-e", "mp4", "-j", "1"])
            .arg("--tool")
            .arg(&tool)
            .args(["a.mov", "please-fail.mov", "c.mov"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let records = job_log(&output.stdout);
        let errors: Vec<_> = records
            .iter()
            .filter(|r| r.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "failure: please-fail.mov, code=3");
        assert!(out.join("c.mp4").is_file());
    }

    #[test]
    fn fail_on_job_error_changes_exit_status() {
        let temp = tempdir().unwrap();
        let tool = fake_tool(temp.path());

        let mut cmd = transforge_cmd();
        cmd.arg("-o")
            .arg(temp.path().join("out"))
            .args(["-e", "mp4", "-j", "2", "--fail-on-job-error"])
            .arg("--tool")
            .arg(&tool)
            .args(["a.mov", "please-fail.mov"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("1 of 2 jobs failed"));
    }

    #[test]
    fn config_supplies_threads_and_actor() {
        let temp = tempdir().unwrap();
        let tool = fake_tool(temp.path());
        let config = temp.path().join("transforge.toml");
        std::fs::write(
            &config,
            format!(
                "[tool]\npath = {:?}\n\n[pool]\nthreads = 3\n\n[log]\nactor = \"farm\"\n",
                tool.display().to_string()
            ),
        )
        .unwrap();

        let mut cmd = transforge_cmd();
        let output = cmd
            .arg("--config")
            .arg(&config)
            .arg("-o")
            .arg(temp.path().join("out"))
            .args(["-e", "mp4", "a.mov", "b.mov"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let records = job_log(&output.stdout);
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.actor == "farm"));
    }
}
