use std::io::BufRead;

use chrono::{DateTime, Utc};

use super::{DialectParser, HistoryLines, ParseError};
use crate::models::{Entry, ShellType};
use crate::parsers::escapes::unescape_fish;
use crate::parsers::timestamps::parse_epoch_seconds;
use crate::utils::CancelToken;

const CMD_MARKER: &str = "- cmd:";
const WHEN_FIELD: &str = "when:";

/// Parser for fish's YAML-like history file
///
/// ```text
/// - cmd: git status
///   when: 1700000000
///   paths:
///     - src/main.rs
/// ```
///
/// An entry is only emitted when the next `- cmd:` line arrives or the input
/// ends, because its `when:` line may still follow.
#[derive(Debug, Clone, Copy, Default)]
pub struct FishParser;

struct PendingBlock {
    command: String,
    timestamp: Option<DateTime<Utc>>,
    raw: String,
}

impl PendingBlock {
    fn finish(self) -> Option<Entry> {
        Entry::new(&unescape_fish(&self.command), self.timestamp, ShellType::Fish, self.raw)
    }
}

impl DialectParser for FishParser {
    fn shell(&self) -> ShellType {
        ShellType::Fish
    }

    fn parse(
        &self,
        reader: &mut dyn BufRead,
        cancel: &CancelToken,
    ) -> Result<Vec<Entry>, ParseError> {
        let mut lines = HistoryLines::new(reader);
        let mut entries = Vec::new();
        let mut pending: Option<PendingBlock> = None;

        loop {
            if cancel.is_cancelled() {
                return Err(ParseError::Cancelled { partial: entries });
            }
            let Some(line) = lines.next_line()? else { break };

            if let Some(command) = line.strip_prefix(CMD_MARKER) {
                if let Some(block) = pending.take() {
                    entries.extend(block.finish());
                }
                pending = Some(PendingBlock {
                    command: command.trim().to_string(),
                    timestamp: None,
                    raw: line.clone(),
                });
                continue;
            }

            // Fields belong to the open block and are always indented
            let Some(block) = pending.as_mut() else { continue };
            if !line.starts_with(char::is_whitespace) {
                continue;
            }
            if let Some(epoch) = line.trim_start().strip_prefix(WHEN_FIELD) {
                block.timestamp = parse_epoch_seconds(epoch);
                block.raw.push('\n');
                block.raw.push_str(&line);
            }
        }

        if let Some(block) = pending {
            entries.extend(block.finish());
        }

        Ok(entries)
    }
}
