//! Parsers for yt-dlp output

use super::traits::{UNKNOWN_AUTHOR, UNKNOWN_TITLE, VideoMetadata};
use crate::utils::sanitize_title;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Diagnostic used when a failed fetch wrote nothing to stderr
pub const UNKNOWN_FETCH_ERROR: &str = "Unknown error occurred";

/// Exit status of an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command exited successfully (exit code 0)
    Success,
    /// The command exited with a non-zero exit code
    Failure,
}

impl ExitStatus {
    /// Returns `true` if the exit status represents success
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<bool> for ExitStatus {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Subset of the `--dump-json` document we care about
#[derive(Debug, Deserialize)]
struct DumpJson {
    title: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
}

/// Parse output from `yt-dlp --dump-json --no-download`
///
/// Only the first JSON line is used; missing fields fall back to
/// [`UNKNOWN_TITLE`] / [`UNKNOWN_AUTHOR`] / no duration.
///
/// # Errors
///
/// Returns [`crate::Error::ExternalTool`] if the command failed or printed
/// something other than a JSON object.
pub fn parse_describe_output(
    stdout: &[u8],
    stderr: &[u8],
    exit_status: ExitStatus,
) -> crate::Result<VideoMetadata> {
    if !exit_status.is_success() {
        let error_output = String::from_utf8_lossy(stderr);
        return Err(crate::Error::ExternalTool(format!(
            "Failed to get video info: {}",
            error_output.trim()
        )));
    }

    let output = String::from_utf8_lossy(stdout);
    let first_line = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| {
            crate::Error::ExternalTool("Failed to parse video information: empty output".into())
        })?;

    let dump: DumpJson = serde_json::from_str(first_line).map_err(|e| {
        crate::Error::ExternalTool(format!("Failed to parse video information: {}", e))
    })?;

    Ok(VideoMetadata {
        title: dump
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        uploader: dump
            .uploader
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        duration_secs: dump
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d as u64),
    })
}

/// Extensions of sidecar subtitle files written next to the video
const SUBTITLE_EXTENSIONS: [&str; 9] = [
    "vtt", "srt", "ass", "ssa", "lrc", "ttml", "srv1", "srv2", "srv3",
];

fn is_subtitle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUBTITLE_EXTENSIONS
                .iter()
                .any(|sub| sub.eq_ignore_ascii_case(ext))
        })
}

fn quoted_path(rest: &str) -> Option<PathBuf> {
    let path = rest.trim().trim_matches('"');
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Recover the downloaded file's path from yt-dlp's log
///
/// Heuristic, in order of preference:
/// 1. `[Merger] Merging formats into "<path>"` (last one wins)
/// 2. `[EmbedSubtitle] Embedding subtitles in "<path>"` (last one wins)
/// 3. the first `[download] Destination: <path>` that is not a subtitle file
/// 4. the first `[download] <path> has already been downloaded` that is not a
///    subtitle file
///
/// Subtitles are written before the video, so their `Destination:` lines come
/// first and are skipped.
///
/// Returns `None` when no line matches.
pub fn parse_destination(stdout: &str) -> Option<PathBuf> {
    let mut merged = None;
    let mut embedded = None;
    let mut destination = None;
    let mut already = None;

    for line in stdout.lines() {
        if let Some((_, rest)) = line.split_once("Merging formats into") {
            if let Some(path) = quoted_path(rest) {
                merged = Some(path);
            }
        } else if let Some((_, rest)) = line.split_once("Embedding subtitles in") {
            if let Some(path) = quoted_path(rest) {
                embedded = Some(path);
            }
        } else if destination.is_none()
            && let Some((_, rest)) = line.split_once("Destination:")
        {
            destination = quoted_path(rest).filter(|p| !is_subtitle_file(p));
        } else if already.is_none()
            && let Some((head, _)) = line.split_once("has already been downloaded")
        {
            already = quoted_path(head.trim_start_matches("[download]"))
                .filter(|p| !is_subtitle_file(p));
        }
    }

    merged.or(embedded).or(destination).or(already)
}

/// Best-effort output path for a successful fetch
///
/// Falls back to `<target_directory>/<sanitized title>.<fallback_extension>`.
/// The fallback ignores the format the tool actually negotiated, so it is
/// only suitable for display.
pub fn resolve_output_path(
    stdout: &str,
    target_directory: &Path,
    title: &str,
    fallback_extension: &str,
) -> PathBuf {
    parse_destination(stdout).unwrap_or_else(|| {
        target_directory.join(format!("{}.{}", sanitize_title(title), fallback_extension))
    })
}

/// Diagnostic text for a failed fetch
pub fn fetch_diagnostic(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        UNKNOWN_FETCH_ERROR.to_string()
    } else {
        trimmed.to_string()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_reads_title_uploader_and_duration() {
        let stdout = br#"{"id": "abc", "title": "Rust in 100 Seconds", "uploader": "Fireship", "duration": 149}"#;

        let meta = parse_describe_output(stdout, b"", ExitStatus::Success).unwrap();

        assert_eq!(meta.title, "Rust in 100 Seconds");
        assert_eq!(meta.uploader, "Fireship");
        assert_eq!(meta.duration_secs, Some(149));
    }

    #[test]
    fn describe_truncates_fractional_duration() {
        let stdout = br#"{"title": "t", "uploader": "u", "duration": 61.9}"#;
        let meta = parse_describe_output(stdout, b"", ExitStatus::Success).unwrap();
        assert_eq!(meta.duration_secs, Some(61));
    }

    #[test]
    fn describe_falls_back_for_missing_fields() {
        let meta = parse_describe_output(br#"{"id": "abc"}"#, b"", ExitStatus::Success).unwrap();

        assert_eq!(meta, VideoMetadata::default());
        assert_eq!(meta.title, "Unknown Title");
        assert_eq!(meta.uploader, "Unknown Author");
        assert_eq!(meta.duration_secs, None);
    }

    #[test]
    fn describe_treats_null_and_zero_as_missing() {
        let stdout = br#"{"title": null, "uploader": "", "duration": 0}"#;
        let meta = parse_describe_output(stdout, b"", ExitStatus::Success).unwrap();
        assert_eq!(meta, VideoMetadata::default());
    }

    #[test]
    fn describe_uses_first_line_of_playlist_dump() {
        let stdout = b"{\"title\": \"first\"}\n{\"title\": \"second\"}\n";
        let meta = parse_describe_output(stdout, b"", ExitStatus::Success).unwrap();
        assert_eq!(meta.title, "first");
    }

    #[test]
    fn describe_failure_carries_stderr() {
        let err = parse_describe_output(
            b"",
            b"ERROR: [youtube] abc: Video unavailable\n",
            ExitStatus::Failure,
        )
        .unwrap_err();

        match err {
            crate::Error::ExternalTool(msg) => {
                assert_eq!(
                    msg,
                    "Failed to get video info: ERROR: [youtube] abc: Video unavailable"
                );
            }
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[test]
    fn describe_rejects_non_json() {
        let err = parse_describe_output(b"not json at all", b"", ExitStatus::Success).unwrap_err();
        match err {
            crate::Error::ExternalTool(msg) => {
                assert!(msg.starts_with("Failed to parse video information"))
            }
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[test]
    fn describe_rejects_empty_output() {
        assert!(parse_describe_output(b"\n\n", b"", ExitStatus::Success).is_err());
    }

    #[test]
    fn destination_line_is_parsed() {
        let stdout = "\
[youtube] Extracting URL: https://www.youtube.com/watch?v=abc
[info] abc: Downloading 1 format(s): 22
[download] Destination: /videos/Rust in 100 Seconds.mp4
[download] 100% of   10.00MiB in 00:00:02 at 4.50MiB/s
";
        assert_eq!(
            parse_destination(stdout),
            Some(PathBuf::from("/videos/Rust in 100 Seconds.mp4"))
        );
    }

    #[test]
    fn merger_line_wins_over_destination() {
        let stdout = "\
[download] Destination: /videos/clip.f137.mp4
[download] Destination: /videos/clip.f140.m4a
[Merger] Merging formats into \"/videos/clip.mp4\"
";
        assert_eq!(
            parse_destination(stdout),
            Some(PathBuf::from("/videos/clip.mp4"))
        );
    }

    #[test]
    fn already_downloaded_line_is_parsed() {
        let stdout = "[download] /videos/clip.mp4 has already been downloaded\n";
        assert_eq!(
            parse_destination(stdout),
            Some(PathBuf::from("/videos/clip.mp4"))
        );
    }

    #[test]
    fn subtitle_destination_is_skipped() {
        let stdout = "\
[info] Writing video subtitles to: /v/Clip.en.vtt
[download] Destination: /v/Clip.en.vtt
[download] 100% of   12.00KiB in 00:00:00 at 1.00MiB/s
[download] Destination: /v/Clip.mp4
[download] 100% of   10.00MiB in 00:00:02 at 4.50MiB/s
";
        assert_eq!(parse_destination(stdout), Some(PathBuf::from("/v/Clip.mp4")));
    }

    #[test]
    fn embed_subtitle_line_names_the_video() {
        let stdout = "\
[download] Destination: /v/Clip.en.vtt
[download] /v/Clip.mp4 has already been downloaded
[EmbedSubtitle] Embedding subtitles in \"/v/Clip.mp4\"
";
        assert_eq!(parse_destination(stdout), Some(PathBuf::from("/v/Clip.mp4")));
    }

    #[test]
    fn only_subtitles_falls_back_to_none() {
        let stdout = "[download] Destination: /v/Clip.en.SRT\n";
        assert_eq!(parse_destination(stdout), None);
    }

    #[test]
    fn describe_failure_keeps_non_utf8_diagnostic() {
        let err = parse_describe_output(
            b"",
            b"ERROR: \xff unavailable\n",
            ExitStatus::Failure,
        )
        .unwrap_err();
        match err {
            crate::Error::ExternalTool(msg) => assert!(msg.contains("unavailable"), "{msg}"),
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[test]
    fn no_destination_in_quiet_output() {
        assert_eq!(parse_destination(""), None);
        assert_eq!(parse_destination("[info] nothing here\n"), None);
    }

    #[test]
    fn resolve_falls_back_to_sanitized_title() {
        let path = resolve_output_path("", Path::new("/videos"), "What's new? Rust 2024!", "mp4");
        assert_eq!(path, PathBuf::from("/videos/Whats new Rust 2024.mp4"));
    }

    #[test]
    fn resolve_prefers_log_path() {
        let path = resolve_output_path(
            "[download] Destination: /videos/real.webm\n",
            Path::new("/videos"),
            "ignored",
            "mp4",
        );
        assert_eq!(path, PathBuf::from("/videos/real.webm"));
    }

    #[test]
    fn diagnostic_uses_placeholder_when_stderr_is_blank() {
        assert_eq!(fetch_diagnostic(""), "Unknown error occurred");
        assert_eq!(fetch_diagnostic("  \n"), "Unknown error occurred");
        assert_eq!(
            fetch_diagnostic("ERROR: Requested format is not available\n"),
            "ERROR: Requested format is not available"
        );
    }

    #[test]
    fn exit_status_from_bool() {
        assert!(ExitStatus::from(true).is_success());
        assert!(!ExitStatus::from(false).is_success());
    }
}
