//! No-op fetch tool for environments without yt-dlp

use super::traits::{FetchOutput, FetchRequest, FetchTool, VideoMetadata};
use async_trait::async_trait;

/// Fetch tool used when no downloader is available
///
/// Every operation returns `Error::NotSupported`. Running a batch against it
/// marks each item failed at the metadata stage without touching the disk,
/// which makes it useful for dry-running a manifest's validation and reporting.
///
/// # Examples
///
/// ```
/// use video_batch_dl::fetcher::{FetchTool, NoOpFetchTool};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tool = NoOpFetchTool;
/// assert!(tool.describe("https://youtu.be/abc").await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct NoOpFetchTool;

const NOT_SUPPORTED: &str =
    "fetching requires the external yt-dlp binary. Install it or pass --yt-dlp <PATH>.";

#[async_trait]
impl FetchTool for NoOpFetchTool {
    async fn version(&self) -> crate::Result<String> {
        Err(crate::Error::NotSupported(NOT_SUPPORTED.into()))
    }

    async fn describe(&self, _url: &str) -> crate::Result<VideoMetadata> {
        Err(crate::Error::NotSupported(NOT_SUPPORTED.into()))
    }

    async fn fetch(&self, _request: &FetchRequest) -> crate::Result<FetchOutput> {
        Err(crate::Error::NotSupported(NOT_SUPPORTED.into()))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
