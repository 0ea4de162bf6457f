//! External fetch tool integration
//!
//! The orchestrator never spawns processes itself. It talks to a [`FetchTool`],
//! a narrow capability interface with three operations:
//!
//! - `version`: pre-flight check, run once at startup
//! - `describe`: metadata for a URL without downloading
//! - `fetch`: download one video according to a [`FetchPolicy`](crate::config::FetchPolicy)
//!
//! Implementations:
//!
//! - [`CliFetchTool`]: runs the external `yt-dlp` binary
//! - [`NoOpFetchTool`]: stub when no downloader is available
//!
//! ## Usage
//!
//! ```no_run
//! use video_batch_dl::config::FetchPolicy;
//! use video_batch_dl::fetcher::{CliFetchTool, FetchRequest, FetchTool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tool = CliFetchTool::from_path().expect("yt-dlp binary not found");
//!
//!     let request = FetchRequest::new(
//!         "https://www.youtube.com/watch?v=abc",
//!         "/home/user/Videos",
//!         FetchPolicy::default(),
//!     );
//!     let output = tool.fetch(&request).await?;
//!     println!("success: {}", output.status.is_success());
//!
//!     Ok(())
//! }
//! ```

mod cli;
mod noop;
mod parser;
mod traits;

pub use cli::{CliFetchTool, INSTALL_HINT, YTDLP_BINARY, build_describe_args, build_fetch_args};
pub use noop::NoOpFetchTool;
pub use parser::{
    ExitStatus, UNKNOWN_FETCH_ERROR, fetch_diagnostic, parse_describe_output, parse_destination,
    resolve_output_path,
};
pub use traits::{
    FetchOutput, FetchRequest, FetchTool, UNKNOWN_AUTHOR, UNKNOWN_TITLE, VideoMetadata,
};
