//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Builder for a fake home directory holding shell history files
pub struct HomeDirBuilder {
    temp_dir: TempDir,
}

impl HomeDirBuilder {
    /// Create a new builder with an empty home directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the home directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `relative` under the home directory, creating parents
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write history file");
        self
    }

    /// Add `~/.bash_history`
    pub fn with_bash(self, content: &str) -> Self {
        self.with_file(".bash_history", content)
    }

    /// Add `~/.zsh_history`
    pub fn with_zsh(self, content: &str) -> Self {
        self.with_file(".zsh_history", content)
    }

    /// Add `~/.local/share/fish/fish_history`
    pub fn with_fish(self, content: &str) -> Self {
        self.with_file(".local/share/fish/fish_history", content)
    }

    /// Add the PowerShell export at its unix location
    pub fn with_powershell(self, content: &str) -> Self {
        self.with_file(".local/share/powershell/history.json", content)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for HomeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// zsh extended-history lines for `(epoch, command)` pairs
pub fn zsh_lines(records: &[(i64, &str)]) -> String {
    records.iter().map(|(ts, cmd)| format!(": {}:0;{}\n", ts, cmd)).collect()
}

/// fish history records for `(epoch, command)` pairs
pub fn fish_lines(records: &[(i64, &str)]) -> String {
    records.iter().map(|(ts, cmd)| format!("- cmd: {}\n  when: {}\n", cmd, ts)).collect()
}

/// A small history spread over every shell
pub fn realistic_home() -> TempDir {
    HomeDirBuilder::new()
        .with_bash("#1700000000\ngit status\ncd /tmp\nexport GITHUB_TOKEN=ghp_abc\nmake test\n")
        .with_zsh(&zsh_lines(&[(1700000100, "git status"), (1700000200, "cargo build")]))
        .with_fish(&fish_lines(&[(1700000300, "npm install"), (1700000050, "make test")]))
        .with_powershell(
            "[\n  {\n    \"CommandLine\": \"Get-Process\",\n    \"StartExecutionTime\": \"2023-11-14T22:20:00Z\"\n  }\n]\n",
        )
        .build()
}
