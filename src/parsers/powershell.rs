use std::io::BufRead;

use chrono::{DateTime, Utc};

use super::{DialectParser, HistoryLines, ParseError};
use crate::models::{Entry, ShellType};
use crate::parsers::escapes::unescape_json_string;
use crate::parsers::timestamps::parse_record_timestamp;
use crate::utils::CancelToken;

const COMMAND_FIELD: &str = "\"CommandLine\":";
const START_TIME_FIELD: &str = "\"StartExecutionTime\":";

/// Parser for PowerShell history exported as JSON (`Get-History | ConvertTo-Json`)
///
/// The export is scanned line by line rather than deserialized: a `{` line
/// opens a record and the matching bare `}` (or `},`) closes it. Nested
/// objects such as PowerShell 7's `Duration` are skipped over by tracking
/// brace depth. Inside a record the top-level `CommandLine` and
/// `StartExecutionTime` fields may come in either order. Records are emitted
/// only when they close, so a truncated export loses at most its last record.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShellParser;

#[derive(Default)]
struct Record {
    /// Open objects, counting the record itself
    depth: usize,
    command: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    raw: String,
}

impl DialectParser for PowerShellParser {
    fn shell(&self) -> ShellType {
        ShellType::PowerShell
    }

    fn parse(
        &self,
        reader: &mut dyn BufRead,
        cancel: &CancelToken,
    ) -> Result<Vec<Entry>, ParseError> {
        let mut lines = HistoryLines::new(reader);
        let mut entries = Vec::new();
        let mut record: Option<Record> = None;

        loop {
            if cancel.is_cancelled() {
                return Err(ParseError::Cancelled { partial: entries });
            }
            let Some(line) = lines.next_line()? else { break };
            let trimmed = line.trim();

            let Some(current) = record.as_mut() else {
                if trimmed == "{" {
                    record = Some(Record { depth: 1, raw: line.clone(), ..Record::default() });
                }
                continue;
            };
            current.raw.push('\n');
            current.raw.push_str(&line);

            if trimmed == "}" || trimmed == "}," {
                current.depth -= 1;
                if current.depth == 0
                    && let Some(Record { command: Some(command), timestamp, raw, .. }) =
                        record.take()
                    && let Some(entry) = Entry::new(&command, timestamp, ShellType::PowerShell, raw)
                {
                    entries.push(entry);
                }
                continue;
            }

            if trimmed.ends_with('{') {
                current.depth += 1;
                continue;
            }
            if current.depth > 1 {
                continue;
            }

            if let Some(value) = trimmed.strip_prefix(COMMAND_FIELD) {
                current.command = string_value(value).map(unescape_json_string);
            } else if let Some(value) = trimmed.strip_prefix(START_TIME_FIELD) {
                current.timestamp = parse_record_timestamp(strip_trailing_comma(value));
            }
        }

        Ok(entries)
    }
}

fn strip_trailing_comma(value: &str) -> &str {
    let value = value.trim();
    value.strip_suffix(',').unwrap_or(value).trim_end()
}

/// Body of a quoted JSON string value, without the quotes or trailing comma
fn string_value(value: &str) -> Option<&str> {
    let value = strip_trailing_comma(value);
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner)
}
