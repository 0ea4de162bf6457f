//! CLI-based fetch tool using the external yt-dlp binary

use super::parser::{ExitStatus, parse_describe_output};
use super::traits::{FetchOutput, FetchRequest, FetchTool, VideoMetadata};
use crate::config::ToolsConfig;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Name of the binary searched for on PATH
pub const YTDLP_BINARY: &str = "yt-dlp";

/// Hint printed when yt-dlp is missing or broken
pub const INSTALL_HINT: &str = "Please install yt-dlp using: pip install yt-dlp";

/// Fetch tool backed by the external `yt-dlp` binary
///
/// Every call spawns one child process and waits for it to exit. The child is
/// killed if the returned future is dropped (e.g. on Ctrl+C).
///
/// # Examples
///
/// ```no_run
/// use video_batch_dl::fetcher::CliFetchTool;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let tool = CliFetchTool::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let tool = CliFetchTool::from_path().expect("yt-dlp not found in PATH");
/// ```
pub struct CliFetchTool {
    binary_path: PathBuf,
}

impl CliFetchTool {
    /// Create a new CLI tool with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which(YTDLP_BINARY).ok().map(Self::new)
    }

    /// Resolve the binary from configuration
    ///
    /// An explicit `ytdlp_path` wins; otherwise PATH is searched when allowed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Startup`] if no binary can be located.
    pub fn from_config(tools: &ToolsConfig) -> crate::Result<Self> {
        if let Some(path) = &tools.ytdlp_path {
            return Ok(Self::new(path.clone()));
        }

        if tools.search_path
            && let Some(tool) = Self::from_path()
        {
            return Ok(tool);
        }

        Err(crate::Error::Startup(
            "yt-dlp is not installed.".to_string(),
        ))
    }

    /// Path of the binary this tool runs
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary_path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

/// Arguments for a fetch invocation
///
/// `--` separates options from the URL so a URL can never be read as a flag.
pub fn build_fetch_args(request: &FetchRequest) -> Vec<OsString> {
    let policy = &request.policy;
    let mut args: Vec<OsString> = vec![
        "--format".into(),
        policy.format_selector().into(),
        "--output".into(),
        request.output_template().into_os_string(),
    ];

    if policy.single_item_only {
        args.push("--no-playlist".into());
    }
    if policy.embed_subtitles {
        args.push("--embed-subs".into());
    }
    if policy.auto_subtitles {
        args.push("--write-auto-sub".into());
    }

    args.push("--".into());
    args.push(request.url.clone().into());
    args
}

/// Arguments for a describe invocation
pub fn build_describe_args(url: &str) -> Vec<OsString> {
    vec![
        "--dump-json".into(),
        "--no-download".into(),
        "--no-playlist".into(),
        "--".into(),
        url.into(),
    ]
}

#[async_trait]
impl FetchTool for CliFetchTool {
    async fn version(&self) -> crate::Result<String> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|_| crate::Error::Startup("yt-dlp is not installed.".to_string()))?;

        if !output.status.success() {
            return Err(crate::Error::Startup(
                "yt-dlp is not installed or not working properly.".to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn describe(&self, url: &str) -> crate::Result<VideoMetadata> {
        debug!(url, "describing video");

        let output = self
            .command()
            .args(build_describe_args(url))
            .output()
            .await
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        parse_describe_output(
            &output.stdout,
            &output.stderr,
            ExitStatus::from(output.status.success()),
        )
    }

    async fn fetch(&self, request: &FetchRequest) -> crate::Result<FetchOutput> {
        let args = build_fetch_args(request);
        debug!(?args, "running yt-dlp");

        let output = self
            .command()
            .args(&args)
            .output()
            .await
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        Ok(FetchOutput {
            status: ExitStatus::from(output.status.success()),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}
