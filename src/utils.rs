//! Utility functions for directories, filenames and display formatting

use crate::error::ItemError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Placeholder used when a title sanitizes to nothing
const UNTITLED: &str = "untitled";

/// Create `path` and all missing parents
///
/// Succeeds without touching anything when the directory already exists, so
/// re-running a manifest is idempotent.
///
/// # Errors
///
/// Returns [`ItemError::Directory`] when the directory cannot be created,
/// including when `path` (or one of its parents) exists as a regular file.
pub async fn ensure_directory(path: &Path) -> Result<(), ItemError> {
    if tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        return Ok(());
    }

    info!(directory = %path.display(), "Creating directory: {}", path.display());

    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| ItemError::Directory {
            path: path.to_path_buf(),
            reason: match e.kind() {
                ErrorKind::PermissionDenied => "Permission denied".to_string(),
                _ => e.to_string(),
            },
        })
}

/// Reduce a title to characters that are safe in a filename
///
/// Keeps alphanumerics, spaces, `-` and `_`, then trims trailing whitespace.
///
/// # Examples
///
/// ```
/// use video_batch_dl::utils::sanitize_title;
///
/// assert_eq!(sanitize_title("Learning Python: Basics!"), "Learning Python Basics");
/// assert_eq!(sanitize_title("???"), "untitled");
/// ```
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let safe: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim_end();

    if safe.is_empty() {
        UNTITLED.to_string()
    } else {
        safe.to_string()
    }
}

/// Format a duration in seconds as `MM:SS`
///
/// Minutes are not wrapped into hours, so long videos read e.g. `125:07`.
///
/// # Examples
///
/// ```
/// use video_batch_dl::utils::format_duration;
///
/// assert_eq!(format_duration(65), "01:05");
/// assert_eq!(format_duration(7507), "125:07");
/// ```
#[must_use]
pub fn format_duration(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
