use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commands shorter than this (in characters, after trimming) are never stored
pub const MIN_COMMAND_LEN: usize = 2;

/// Shell dialect a history entry was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Unknown,
}

impl ShellType {
    /// Dialects the detector knows how to locate
    pub const DETECTABLE: [ShellType; 4] =
        [ShellType::Bash, ShellType::Zsh, ShellType::Fish, ShellType::PowerShell];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
            ShellType::PowerShell => "powershell",
            ShellType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ShellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One historical command invocation
///
/// `timestamp` is `None` when the dialect recorded no time for the command.
/// Entries are built through [`Entry::new`], which guarantees `command` is
/// trimmed and at least [`MIN_COMMAND_LEN`] characters long. They are
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    command: String,
    timestamp: Option<DateTime<Utc>>,
    shell: ShellType,
    raw: String,
}

impl Entry {
    /// Build an entry, returning `None` if the trimmed command is too short
    pub fn new(
        command: &str,
        timestamp: Option<DateTime<Utc>>,
        shell: ShellType,
        raw: impl Into<String>,
    ) -> Option<Self> {
        let command = command.trim();
        if !is_long_enough(command) {
            return None;
        }
        Some(Self { command: command.to_string(), timestamp, shell, raw: raw.into() })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn shell(&self) -> ShellType {
        self.shell
    }

    /// The source line(s) the entry was parsed from, untrimmed
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// True if the trimmed command meets the minimum length
pub fn is_long_enough(command: &str) -> bool {
    command.trim().chars().count() >= MIN_COMMAND_LEN
}
