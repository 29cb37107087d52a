use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Maximum size of a history file we are willing to parse: 64MB
pub const MAX_HISTORY_FILE_BYTES: u64 = 64 * 1024 * 1024;

/// Open a history file for reading after checking it is a regular file of sane size
///
/// The size check runs against the open handle to avoid TOCTOU races between
/// the check and the read.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not a regular file, or is
/// larger than [`MAX_HISTORY_FILE_BYTES`].
pub fn open_history_file(path: &Path) -> Result<File> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open history file: {}", path.display()))?;
    validate_file_size(&file, path)?;
    Ok(file)
}

/// Validates that a file's size is within acceptable limits
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The path is not a regular file
/// - The file is larger than [`MAX_HISTORY_FILE_BYTES`]
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    if !metadata.is_file() {
        bail!("Not a regular file: {}", path.display());
    }

    let file_size = metadata.len();
    if file_size > MAX_HISTORY_FILE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_HISTORY_FILE_BYTES
        );
    }

    Ok(())
}

/// True if `path` is a regular file we can open for reading
pub fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

/// Formats a path with ~ substitution for the given home directory
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shell_history_ingest::format_path_with_tilde;
///
/// let formatted = format_path_with_tilde(Path::new("/home/alice/.zsh_history"), Path::new("/home/alice"));
/// assert_eq!(formatted, "~/.zsh_history");
/// ```
pub fn format_path_with_tilde(path: &Path, home: &Path) -> String {
    if let Ok(rest) = path.strip_prefix(home) {
        return Path::new("~").join(rest).to_string_lossy().into_owned();
    }

    // Avoid double allocation when converting Cow to String
    match path.to_string_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
