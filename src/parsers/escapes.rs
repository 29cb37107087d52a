/// Unescape the body of a JSON string literal (without its surrounding quotes)
///
/// Decoding is done by serde_json, so every JSON escape including UTF-16
/// surrogate pairs is understood. A body that is not a valid JSON string is
/// returned unchanged.
pub fn unescape_json_string(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    serde_json::from_str::<String>(&format!("\"{}\"", s)).unwrap_or_else(|_| s.to_string())
}

/// Unescape a command as stored in fish's history file
///
/// fish writes a literal backslash as `\\` and an embedded newline as `\n`.
pub fn unescape_fish(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
