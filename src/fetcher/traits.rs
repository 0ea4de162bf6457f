//! Traits and types for the external fetch tool

use super::parser::ExitStatus;
use crate::config::FetchPolicy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title shown when the fetch tool does not report one
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Uploader shown when the fetch tool does not report one
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Metadata returned by a describe invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Title embedded in the video, or [`UNKNOWN_TITLE`]
    pub title: String,
    /// Uploader/channel name, or [`UNKNOWN_AUTHOR`]
    pub uploader: String,
    /// Duration in whole seconds, when reported
    pub duration_secs: Option<u64>,
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            uploader: UNKNOWN_AUTHOR.to_string(),
            duration_secs: None,
        }
    }
}

/// Everything needed to fetch one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Source URL
    pub url: String,
    /// Directory the file is written to
    pub target_directory: PathBuf,
    /// Resolution cap, naming and subtitle policy
    pub policy: FetchPolicy,
}

impl FetchRequest {
    /// Create a request for `url` landing in `target_directory`
    pub fn new(url: impl Into<String>, target_directory: impl Into<PathBuf>, policy: FetchPolicy) -> Self {
        Self {
            url: url.into(),
            target_directory: target_directory.into(),
            policy,
        }
    }

    /// Full output template, e.g. `/videos/%(title)s.%(ext)s`
    pub fn output_template(&self) -> PathBuf {
        self.target_directory.join(&self.policy.output_template)
    }
}

/// Captured result of a fetch invocation
///
/// The exit status alone decides success; the text is kept for diagnostics
/// and best-effort output path recovery.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    /// Whether the tool exited successfully
    pub status: ExitStatus,
    /// Raw exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Trait for the external media fetch tool
///
/// Implementations can shell out to a binary, bind a library, or script
/// replies for tests. All calls are made sequentially by the orchestrator.
///
/// # Examples
///
/// ```no_run
/// use video_batch_dl::fetcher::{CliFetchTool, FetchTool};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tool = CliFetchTool::from_path().expect("yt-dlp binary not found");
/// println!("yt-dlp {}", tool.version().await?);
///
/// let info = tool.describe("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
/// println!("{} by {}", info.title, info.uploader);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FetchTool: Send + Sync {
    /// Report the tool version
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Startup`] if the tool is missing or broken.
    async fn version(&self) -> crate::Result<String>;

    /// Describe a video without downloading it
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be executed, exits with a non-zero
    /// status, or prints something that is not a metadata document.
    async fn describe(&self, url: &str) -> crate::Result<VideoMetadata>;

    /// Download one video
    ///
    /// A non-zero exit is *not* an error here: it is reported through
    /// [`FetchOutput::status`] so the caller can classify it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool could not be run at all.
    async fn fetch(&self, request: &FetchRequest) -> crate::Result<FetchOutput>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
