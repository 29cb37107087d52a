//! Terminal output sanitization
//!
//! Shell history is user-controlled data and may contain raw escape sequences
//! (pasted program output, `printf '\e[...'`). Anything the CLI echoes back goes
//! through [`sanitize_for_display`] first so a history line cannot take over
//! the terminal.

/// Marker shown in place of embedded newlines in multi-line commands
const NEWLINE_MARKER: &str = " ⏎ ";

/// Strips escape sequences and control characters and flattens the text to one line
///
/// Removes CSI sequences (`ESC [ ... letter`) and OSC sequences
/// (`ESC ] ... BEL` or `ESC ] ... ESC \`). Embedded newlines become
/// [`NEWLINE_MARKER`]; tabs are kept and every other control character is dropped.
///
/// # Examples
///
/// ```
/// use shell_history_ingest::utils::terminal::sanitize_for_display;
///
/// assert_eq!(sanitize_for_display("\x1b[31mgit push\x1b[0m"), "git push");
/// assert_eq!(sanitize_for_display("for f in *\ndo echo $f\ndone"), "for f in * ⏎ do echo $f ⏎ done");
/// ```
pub fn sanitize_for_display(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters run until the final byte, which is a letter
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                // Lone ESC or a two-character sequence: drop the ESC only
                _ => {}
            },
            '\n' => result.push_str(NEWLINE_MARKER),
            '\t' => result.push(ch),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}
