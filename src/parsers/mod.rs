//! Line-oriented parsers for shell history dialects
//!
//! # Error Handling Strategy
//!
//! History files are hand-edited, truncated and written by several shell
//! versions at once, so the parsers degrade rather than fail:
//!
//! - **Malformed timestamps** never abort a parse. The entry is kept with a
//!   `None` timestamp.
//! - **Invalid UTF-8** is decoded lossily, so stray bytes cost at most a few
//!   replacement characters.
//! - **Short commands** (fewer than two characters) are dropped before an
//!   [`Entry`] is built.
//! - **I/O errors** fail the whole source with [`ParseError::Io`]; the reader
//!   logs them and moves on to the other sources.
//! - **Cancellation** is checked before every line and returns
//!   [`ParseError::Cancelled`] carrying every entry emitted so far.

pub mod bash;
pub mod escapes;
pub mod fish;
pub mod powershell;
pub mod timestamps;
pub mod zsh;

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use bash::BashParser;
pub use fish::FishParser;
pub use powershell::PowerShellParser;
pub use zsh::ZshParser;

use crate::models::{Entry, ShellType};
use crate::utils::{CancelToken, open_history_file};

/// Why a history source produced no (or only partial) results
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parsing cancelled after {} entries", .partial.len())]
    Cancelled { partial: Vec<Entry> },
    #[error("failed to read history: {0}")]
    Io(#[from] io::Error),
    #[error("cannot read {}: {reason:#}", .path.display())]
    Unreadable { path: PathBuf, reason: anyhow::Error },
}

impl ParseError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ParseError::Cancelled { .. })
    }
}

/// A parser for one shell's on-disk history format
pub trait DialectParser: Send + Sync {
    /// Shell tag attached to every entry this parser produces
    fn shell(&self) -> ShellType;

    /// Parse a whole history stream into entries, in file order
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the stream cannot be read and
    /// [`ParseError::Cancelled`] (with the entries parsed so far) if `cancel`
    /// fires before the end of input.
    fn parse(
        &self,
        reader: &mut dyn BufRead,
        cancel: &CancelToken,
    ) -> Result<Vec<Entry>, ParseError>;
}

/// Select the parser for a shell dialect
///
/// Unknown shells are read as plain one-command-per-line files.
pub fn parser_for(shell: ShellType) -> Box<dyn DialectParser> {
    match shell {
        ShellType::Bash => Box::new(BashParser::new()),
        ShellType::Zsh => Box::new(ZshParser),
        ShellType::Fish => Box::new(FishParser),
        ShellType::PowerShell => Box::new(PowerShellParser),
        ShellType::Unknown => Box::new(BashParser::tagged(ShellType::Unknown)),
    }
}

/// Open and parse one history file with the parser for `shell`
pub fn parse_file(
    shell: ShellType,
    path: &Path,
    cancel: &CancelToken,
) -> Result<Vec<Entry>, ParseError> {
    let file = open_history_file(path)
        .map_err(|reason| ParseError::Unreadable { path: path.to_path_buf(), reason })?;
    let mut reader = BufReader::new(file);
    parser_for(shell).parse(&mut reader, cancel)
}

/// Reads lines as bytes and decodes them lossily
///
/// Trailing `\n` and `\r\n` are stripped.
pub(crate) struct HistoryLines<'a> {
    reader: &'a mut dyn BufRead,
    buf: Vec<u8>,
}

impl<'a> HistoryLines<'a> {
    pub(crate) fn new(reader: &'a mut dyn BufRead) -> Self {
        Self { reader, buf: Vec::new() }
    }

    pub(crate) fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_history_lines_strips_line_endings() {
        let mut cursor = Cursor::new(b"one\r\ntwo\nthree".to_vec());
        let mut lines = HistoryLines::new(&mut cursor);
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn test_history_lines_tolerates_invalid_utf8() {
        let mut cursor = Cursor::new(b"echo \xff\xfe ok\n".to_vec());
        let mut lines = HistoryLines::new(&mut cursor);
        let line = lines.next_line().unwrap().unwrap();
        assert!(line.starts_with("echo "));
        assert!(line.ends_with(" ok"));
    }

    #[test]
    fn test_parser_for_tags_entries() {
        for shell in ShellType::DETECTABLE {
            assert_eq!(parser_for(shell).shell(), shell);
        }
        assert_eq!(parser_for(ShellType::Unknown).shell(), ShellType::Unknown);
    }

    #[test]
    fn test_parse_file_reads_zsh_history() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b": 1700000000:0;git status\n: 1700000100:2;cargo test\n").unwrap();
        file.flush().unwrap();

        let entries = parse_file(ShellType::Zsh, file.path(), &CancelToken::new()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].command(), "cargo test");
    }

    #[test]
    fn test_parse_file_missing_is_unreadable() {
        let result = parse_file(
            ShellType::Bash,
            Path::new("/nonexistent/.bash_history"),
            &CancelToken::new(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ParseError::Unreadable { .. }));
        assert!(err.to_string().contains("Failed to open history file"));
    }
}
