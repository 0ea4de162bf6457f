//! Scripted in-process fetch tool

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::oneshot;
use video_batch_dl::fetcher::{ExitStatus, FetchOutput, FetchRequest, FetchTool, VideoMetadata};

/// A call observed by [`MockFetchTool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Describe(String),
    Fetch(String),
}

/// Fetch tool whose replies are configured per URL
///
/// By default every describe and fetch succeeds.
#[derive(Default)]
pub struct MockFetchTool {
    calls: Mutex<Vec<Call>>,
    failing_describe: HashSet<String>,
    failing_fetch: HashSet<String>,
    silent_failures: bool,
    hang_on: Option<String>,
    hang_started: Mutex<Option<oneshot::Sender<()>>>,
}

impl MockFetchTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the describe invocation for `url` fail
    pub fn fail_describe(mut self, url: &str) -> Self {
        self.failing_describe.insert(url.to_string());
        self
    }

    /// Make the fetch invocation for `url` exit with status 1
    pub fn fail_fetch(mut self, url: &str) -> Self {
        self.failing_fetch.insert(url.to_string());
        self
    }

    /// Failed fetches write nothing to stderr
    pub fn silent_failures(mut self) -> Self {
        self.silent_failures = true;
        self
    }

    /// Never finish fetching `url`; `started` fires once the fetch begins
    pub fn hang_on(mut self, url: &str, started: oneshot::Sender<()>) -> Self {
        self.hang_on = Some(url.to_string());
        self.hang_started = Mutex::new(Some(started));
        self
    }

    /// Every call, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned").clone()
    }

    /// URLs passed to fetch, in order
    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(url) => Some(url),
                Call::Describe(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl FetchTool for MockFetchTool {
    async fn version(&self) -> video_batch_dl::Result<String> {
        Ok("2024.08.06".to_string())
    }

    async fn describe(&self, url: &str) -> video_batch_dl::Result<VideoMetadata> {
        self.calls
            .lock()
            .expect("poisoned")
            .push(Call::Describe(url.to_string()));

        if self.failing_describe.contains(url) {
            return Err(video_batch_dl::Error::ExternalTool(
                "Failed to get video info: ERROR: Video unavailable".to_string(),
            ));
        }

        Ok(VideoMetadata {
            title: format!("Remote {url}"),
            uploader: "Uploader".to_string(),
            duration_secs: Some(754),
        })
    }

    async fn fetch(&self, request: &FetchRequest) -> video_batch_dl::Result<FetchOutput> {
        self.calls
            .lock()
            .expect("poisoned")
            .push(Call::Fetch(request.url.clone()));

        if self.hang_on.as_deref() == Some(request.url.as_str()) {
            if let Some(started) = self.hang_started.lock().expect("poisoned").take() {
                started.send(()).ok();
            }
            std::future::pending::<()>().await;
        }

        if self.failing_fetch.contains(&request.url) {
            let stderr = if self.silent_failures {
                String::new()
            } else {
                format!("ERROR: unable to download {}: HTTP Error 403: Forbidden\n", request.url)
            };
            return Ok(FetchOutput {
                status: ExitStatus::Failure,
                code: Some(1),
                stdout: String::new(),
                stderr,
            });
        }

        let destination = request.target_directory.join("downloaded.mp4");
        Ok(FetchOutput {
            status: ExitStatus::Success,
            code: Some(0),
            stdout: format!("[download] Destination: {}\n", destination.display()),
            stderr: String::new(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
