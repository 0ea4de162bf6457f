//! Configuration types for video-batch-dl
//!
//! The manifest only lists *what* to download. *How* each item is fetched is
//! a fixed policy described here; the CLI builds a [`Config`] from defaults
//! plus a few flags.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Highest vertical resolution the fetch policy may request
pub const MAX_SUPPORTED_HEIGHT: u32 = 1080;

/// Parameters passed to every fetch invocation
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Maximum video height in pixels (default: 1080)
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Output filename template, relative to the item's target directory
    /// (default: "%(title)s.%(ext)s")
    #[serde(default = "default_output_template")]
    pub output_template: String,

    /// Fetch exactly one video even when the URL points into a playlist (default: true)
    #[serde(default = "default_true")]
    pub single_item_only: bool,

    /// Embed subtitles into the output container when available (default: true)
    #[serde(default = "default_true")]
    pub embed_subtitles: bool,

    /// Also fetch auto-generated subtitle tracks (default: true)
    #[serde(default = "default_true")]
    pub auto_subtitles: bool,

    /// Extension used when guessing the output filename (default: "mp4")
    ///
    /// Only used for display when the tool's log does not reveal the real path.
    #[serde(default = "default_fallback_extension")]
    pub fallback_extension: String,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_height: default_max_height(),
            output_template: default_output_template(),
            single_item_only: true,
            embed_subtitles: true,
            auto_subtitles: true,
            fallback_extension: default_fallback_extension(),
        }
    }
}

impl FetchPolicy {
    /// yt-dlp format selector honouring the resolution cap
    pub fn format_selector(&self) -> String {
        format!("best[height<={}]", self.max_height)
    }
}

/// Location of the external fetch tool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
        }
    }
}

/// Main configuration for a batch run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Policy applied to every fetch invocation
    #[serde(default)]
    pub fetch: FetchPolicy,

    /// External tool discovery
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Check that the configuration can drive a batch
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let policy = &self.fetch;

        if policy.max_height == 0 || policy.max_height > MAX_SUPPORTED_HEIGHT {
            return Err(config_error(
                format!(
                    "max_height must be between 1 and {}, got {}",
                    MAX_SUPPORTED_HEIGHT, policy.max_height
                ),
                "fetch.max_height",
            ));
        }

        if !policy.output_template.contains("%(ext)s") {
            return Err(config_error(
                "output_template must contain the %(ext)s placeholder",
                "fetch.output_template",
            ));
        }

        if policy.fallback_extension.is_empty() || policy.fallback_extension.contains('.') {
            return Err(config_error(
                "fallback_extension must be a bare extension such as \"mp4\"",
                "fetch.fallback_extension",
            ));
        }

        if self.tools.ytdlp_path.is_none() && !self.tools.search_path {
            return Err(config_error(
                "no yt-dlp path configured and PATH search is disabled",
                "tools.ytdlp_path",
            ));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>, key: &str) -> Error {
    Error::Config {
        message: message.into(),
        key: Some(key.to_string()),
    }
}

fn default_max_height() -> u32 {
    MAX_SUPPORTED_HEIGHT
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

fn default_fallback_extension() -> String {
    "mp4".to_string()
}

fn default_true() -> bool {
    true
}
