/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use common::{HomeDirBuilder, realistic_home, zsh_lines};
use predicates::prelude::*;
use shell_history_ingest::JsonlStore;

/// The binary with `HOME` pointed at `home` and every history override cleared
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shell-history-ingest"));
    cmd.env("HOME", home)
        .env_remove("HISTFILE")
        .env_remove("ZDOTDIR")
        .env_remove("XDG_DATA_HOME")
        .env_remove("PSHISTFILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_no_command_shows_help_message() {
    let home = HomeDirBuilder::new().build();
    cli(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --help for usage information"));
}

#[test]
fn test_cli_help_flag() {
    let home = HomeDirBuilder::new().build();
    cli(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Collect and import command history"))
        .stdout(predicate::str::contains("sources"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_cli_version_flag() {
    let home = HomeDirBuilder::new().build();
    cli(home.path()).arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let home = HomeDirBuilder::new().build();
    cli(home.path()).arg("invalid-command").assert().failure();
}

#[test]
fn test_cli_sources_lists_detected_files() {
    let home = realistic_home();
    cli(home.path())
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("~/.zsh_history"))
        .stdout(predicate::str::contains("~/.local/share/fish/fish_history"));
}

#[test]
fn test_cli_sources_with_empty_home() {
    let home = HomeDirBuilder::new().build();
    cli(home.path())
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("No shell history files found"));
}

#[test]
fn test_cli_stats_command_with_data() {
    let home = realistic_home();
    cli(home.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell History Statistics"))
        .stdout(predicate::str::contains("Total entries: 8"))
        .stdout(predicate::str::contains("Unique commands: 6"))
        .stdout(predicate::str::contains("Most used: git status (2 times)"))
        .stdout(predicate::str::contains("Oldest entry: 2023-11-14 22:13:20"));
}

#[test]
fn test_cli_stats_without_history_fails() {
    let home = HomeDirBuilder::new().build();
    cli(home.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no shell history files found"));
}

#[test]
fn test_cli_home_flag_overrides_home_env() {
    let home = HomeDirBuilder::new().with_bash("git status\nmake test\n").build();
    let elsewhere = HomeDirBuilder::new().build();
    cli(elsewhere.path())
        .arg("stats")
        .arg("--home")
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total entries: 2"));
}

#[test]
fn test_cli_import_writes_jsonl() {
    let home = realistic_home();
    let output = home.path().join("imported.jsonl");

    cli(home.path())
        .args(["import", "--workers", "2", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 5 commands"))
        .stdout(predicate::str::contains("Skipped: 1"));

    let stored = JsonlStore::load(&output).unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|c| !c.command.contains("TOKEN")));
}

#[test]
fn test_cli_import_dry_run_writes_nothing() {
    let home = HomeDirBuilder::new()
        .with_zsh(&zsh_lines(&[(1700000000, "cargo build"), (1700000001, "cargo test")]))
        .build();
    let output = home.path().join("imported.jsonl");

    cli(home.path())
        .args(["import", "--dry-run", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run: would import 2 commands"));

    assert!(!output.exists());
}

#[test]
fn test_cli_rejects_zero_workers() {
    let home = realistic_home();
    cli(home.path()).args(["stats", "--workers", "0"]).assert().failure();
}

#[test]
fn test_cli_stats_sanitizes_terminal_escapes() {
    let home = HomeDirBuilder::new().with_bash("echo \x1b[31mred\x1b[0m\n").build();
    cli(home.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Most used: echo red (1 times)"));
}
