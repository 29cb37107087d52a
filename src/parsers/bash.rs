use std::io::BufRead;

use chrono::{DateTime, Utc};

use super::{DialectParser, HistoryLines, ParseError};
use crate::models::{Entry, ShellType};
use crate::parsers::timestamps::parse_epoch_seconds;
use crate::utils::CancelToken;

/// Low-information commands dropped from plain history (matched on the first word)
const SKIP_COMMANDS: &[&str] =
    &["cd", "ls", "ll", "la", "l", "pwd", "clear", "exit", "history", ".."];

/// Parser for plain one-command-per-line history (`~/.bash_history`)
///
/// With `HISTTIMEFORMAT` set, bash writes a `#<epoch>` line before each
/// command. A marker applies to the next command line only.
#[derive(Debug, Clone)]
pub struct BashParser {
    shell: ShellType,
}

impl BashParser {
    pub fn new() -> Self {
        Self::tagged(ShellType::Bash)
    }

    /// Plain-line parser that tags its entries with a different shell
    pub fn tagged(shell: ShellType) -> Self {
        Self { shell }
    }
}

impl Default for BashParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectParser for BashParser {
    fn shell(&self) -> ShellType {
        self.shell
    }

    fn parse(
        &self,
        reader: &mut dyn BufRead,
        cancel: &CancelToken,
    ) -> Result<Vec<Entry>, ParseError> {
        let mut lines = HistoryLines::new(reader);
        let mut entries = Vec::new();
        let mut next_timestamp: Option<DateTime<Utc>> = None;

        loop {
            if cancel.is_cancelled() {
                return Err(ParseError::Cancelled { partial: entries });
            }
            let Some(line) = lines.next_line()? else { break };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(ts) = timestamp_marker(trimmed) {
                next_timestamp = ts;
                continue;
            }

            // The marker belongs to this line whether or not we keep it
            let timestamp = next_timestamp.take();

            if is_skipped(trimmed) {
                continue;
            }

            if let Some(entry) = Entry::new(trimmed, timestamp, self.shell, line.as_str()) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }
}

/// `Some(ts)` if the line is a `#<digits>` timestamp marker
///
/// A marker whose digits overflow still counts as a marker, with no timestamp.
fn timestamp_marker(line: &str) -> Option<Option<DateTime<Utc>>> {
    let digits = line.strip_prefix('#')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(parse_epoch_seconds(digits))
}

fn is_skipped(command: &str) -> bool {
    command.split_whitespace().next().is_some_and(|word| SKIP_COMMANDS.contains(&word))
}
