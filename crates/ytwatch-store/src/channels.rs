use std::path::Path;

use crate::error::StoreError;

/// Reads a newline-separated list of channel handles.
///
/// Lines are trimmed; blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read.
pub fn read_channel_handles(path: impl AsRef<Path>) -> Result<Vec<String>, StoreError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    Ok(parse_channel_handles(&raw))
}

fn parse_channel_handles(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}
