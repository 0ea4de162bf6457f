//! Batch orchestration
//!
//! Items are processed one at a time, in manifest order. Each item walks the
//! state machine documented on [`ItemState`]; any failure is recorded in that
//! item's [`ItemReport`] and the batch moves on. Only a user interrupt stops a
//! running batch early.

use crate::config::Config;
use crate::error::ItemError;
use crate::fetcher::{FetchRequest, FetchTool, fetch_diagnostic, resolve_output_path};
use crate::types::{BatchDescriptor, BatchResult, Event, ItemReport, ItemState, WorkItem};
use crate::utils::{ensure_directory, format_duration};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Capacity of the event channel; slow subscribers miss old events
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Runs a batch against a [`FetchTool`]
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use video_batch_dl::{BatchOrchestrator, CliFetchTool, Config, load_manifest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let batch = load_manifest(Path::new("videos.yaml"))?;
/// let tool = CliFetchTool::from_path().expect("yt-dlp not found");
///
/// let orchestrator = BatchOrchestrator::new(Arc::new(tool), Arc::new(Config::default()));
/// let result = orchestrator.run(&batch).await;
/// println!("{}/{} succeeded", result.succeeded, result.total);
/// # Ok(())
/// # }
/// ```
pub struct BatchOrchestrator {
    /// Tool performing describe/fetch invocations
    fetch_tool: Arc<dyn FetchTool>,
    /// Fetch policy and tool settings
    config: Arc<Config>,
    /// Event channel for progress observers
    event_tx: broadcast::Sender<Event>,
}

impl BatchOrchestrator {
    /// Create an orchestrator using `fetch_tool`
    pub fn new(fetch_tool: Arc<dyn FetchTool>, config: Arc<Config>) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fetch_tool,
            config,
            event_tx,
        }
    }

    /// Subscribe to progress events
    ///
    /// Only events emitted after subscribing are received.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Process every item of `batch`
    pub async fn run(&self, batch: &BatchDescriptor) -> BatchResult {
        self.run_until(batch, std::future::pending()).await
    }

    /// Process `batch` until done or until `interrupt` resolves
    ///
    /// When `interrupt` fires mid-item, the in-flight item is abandoned (its
    /// future is dropped, which kills a running child process) and is not
    /// counted. Items already finished keep their outcome.
    pub async fn run_until<F>(&self, batch: &BatchDescriptor, interrupt: F) -> BatchResult
    where
        F: Future<Output = ()>,
    {
        let mut result = BatchResult::new(batch.len());
        tokio::pin!(interrupt);

        debug!(
            tool = self.fetch_tool.name(),
            total = batch.len(),
            "starting batch"
        );

        for item in batch.items() {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    result.interrupted = true;
                    break;
                }
                report = self.process_item_guarded(item) => {
                    result.record(report);
                }
            }
        }

        if result.interrupted {
            warn!(
                succeeded = result.succeeded,
                total = result.total,
                "Download interrupted by user"
            );
            self.emit(Event::BatchInterrupted {
                succeeded: result.succeeded,
                total: result.total,
            });
        } else {
            info!(
                succeeded = result.succeeded,
                failed = result.failed,
                total = result.total,
                "Batch download process completed."
            );
            self.emit(Event::BatchComplete {
                succeeded: result.succeeded,
                failed: result.failed,
                total: result.total,
            });
        }

        result
    }

    /// Process one item, converting a panic into a failed report
    async fn process_item_guarded(&self, item: &WorkItem) -> ItemReport {
        match AssertUnwindSafe(self.process_item(item))
            .catch_unwind()
            .await
        {
            Ok(report) => report,
            Err(payload) => self.fail(
                item,
                ItemState::Faulted,
                ItemError::Unexpected(panic_message(payload.as_ref())),
            ),
        }
    }

    /// Walk one item through describe → directory → fetch
    pub async fn process_item(&self, item: &WorkItem) -> ItemReport {
        let title = &item.display_title;
        let url = &item.source_reference;

        info!(
            position = item.position,
            title = %title,
            url = %url,
            "Processing video: '{}' (URL: {})",
            title,
            url
        );
        self.emit(Event::ItemStarted {
            position: item.position,
            title: title.clone(),
            url: url.clone(),
        });
        self.advance(item, ItemState::Pending);

        self.advance(item, ItemState::FetchingMetadata);
        info!("Fetching video information...");
        let metadata = match self.fetch_tool.describe(url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                return self.fail(item, ItemState::MetadataFailed, ItemError::Metadata(e.to_string()));
            }
        };

        info!("Video: '{}' by {}", metadata.title, metadata.uploader);
        if let Some(duration) = metadata.duration_secs {
            info!("Duration: {}", format_duration(duration));
        }
        self.emit(Event::MetadataFetched {
            position: item.position,
            title: metadata.title.clone(),
            uploader: metadata.uploader.clone(),
            duration_secs: metadata.duration_secs,
        });

        let directory = &item.target_directory;
        if let Err(e) = ensure_directory(directory).await {
            return self.fail(item, ItemState::DirectoryFailed, e);
        }
        self.advance(item, ItemState::DirectoryReady);

        self.advance(item, ItemState::Downloading);
        info!("Downloading to: {}", directory.display());
        self.emit(Event::Downloading {
            position: item.position,
            target_directory: directory.clone(),
        });

        let request = FetchRequest::new(url.clone(), directory.clone(), self.config.fetch.clone());
        let output = match self.fetch_tool.fetch(&request).await {
            Ok(output) => output,
            Err(e) => {
                return self.fail(item, ItemState::Faulted, ItemError::Unexpected(e.to_string()));
            }
        };

        if !output.status.is_success() {
            debug!(position = item.position, code = ?output.code, "fetch exited with failure");
            return self.fail(
                item,
                ItemState::DownloadFailed,
                ItemError::Fetch {
                    diagnostic: fetch_diagnostic(&output.stderr),
                },
            );
        }

        let output_path = resolve_output_path(
            &output.stdout,
            directory,
            &metadata.title,
            &self.config.fetch.fallback_extension,
        );
        info!(
            position = item.position,
            path = %output_path.display(),
            "Successfully downloaded '{}' to '{}'",
            metadata.title,
            directory.display()
        );
        self.emit(Event::ItemSucceeded {
            position: item.position,
            output_path: output_path.clone(),
        });

        ItemReport::succeeded(item, output_path)
    }

    fn fail(&self, item: &WorkItem, state: ItemState, error: ItemError) -> ItemReport {
        error!(
            position = item.position,
            code = error.error_code(),
            "Error processing video '{}' (URL: {}): {}",
            item.display_title,
            item.source_reference,
            error
        );
        warn!("Skipping video '{}' due to error.", item.display_title);
        self.emit(Event::ItemFailed {
            position: item.position,
            state,
            error: error.to_string(),
        });
        ItemReport::failed(item, state, error)
    }

    fn advance(&self, item: &WorkItem, state: ItemState) {
        debug_assert!(!state.is_terminal(), "terminal states are reported by fail/succeed");
        debug!(position = item.position, ?state, "item state");
        self.emit(Event::ItemStateChanged {
            position: item.position,
            state,
        });
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine
        self.event_tx.send(event).ok();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
