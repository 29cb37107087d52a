use std::io::BufRead;

use chrono::{DateTime, Utc};

use super::{DialectParser, HistoryLines, ParseError};
use crate::models::{Entry, ShellType};
use crate::parsers::timestamps::parse_epoch_seconds;
use crate::utils::CancelToken;

/// Parser for zsh `EXTENDED_HISTORY` files
///
/// Each record looks like `: <epoch>:<duration>;<command>`. Lines without the
/// prefix are plain commands with no timestamp. A command line ending in a
/// backslash continues on the next line, which is how zsh stores multi-line
/// commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZshParser;

/// A command still collecting continuation lines
struct Pending {
    timestamp: Option<DateTime<Utc>>,
    command: String,
    raw: String,
}

impl Pending {
    fn finish(self) -> Option<Entry> {
        Entry::new(&self.command, self.timestamp, ShellType::Zsh, self.raw)
    }
}

impl DialectParser for ZshParser {
    fn shell(&self) -> ShellType {
        ShellType::Zsh
    }

    fn parse(
        &self,
        reader: &mut dyn BufRead,
        cancel: &CancelToken,
    ) -> Result<Vec<Entry>, ParseError> {
        let mut lines = HistoryLines::new(reader);
        let mut entries = Vec::new();
        let mut pending: Option<Pending> = None;

        loop {
            if cancel.is_cancelled() {
                return Err(ParseError::Cancelled { partial: entries });
            }
            let Some(line) = lines.next_line()? else { break };

            let mut current = match pending.take() {
                Some(mut continued) => {
                    continued.command.push('\n');
                    continued.command.push_str(&line);
                    continued.raw.push('\n');
                    continued.raw.push_str(&line);
                    continued
                }
                None => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let (timestamp, command) = match split_extended(&line) {
                        Some((timestamp, command)) => (timestamp, command),
                        None => (None, line.as_str()),
                    };
                    Pending { timestamp, command: command.to_string(), raw: line.clone() }
                }
            };

            if current.command.ends_with('\\') {
                current.command.pop();
                pending = Some(current);
                continue;
            }

            entries.extend(current.finish());
        }

        // Input ended inside a continuation
        if let Some(current) = pending {
            entries.extend(current.finish());
        }

        Ok(entries)
    }
}

/// Split `: <epoch>:<duration>;<command>` into its timestamp and command
///
/// Returns `None` when the line does not have the extended shape. A malformed
/// epoch keeps the shape but yields no timestamp.
fn split_extended(line: &str) -> Option<(Option<DateTime<Utc>>, &str)> {
    let rest = line.strip_prefix(": ")?;
    let (meta, command) = rest.split_once(';')?;
    let (epoch, _duration) = meta.split_once(':')?;
    Some((parse_epoch_seconds(epoch), command))
}
