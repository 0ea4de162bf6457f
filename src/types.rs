//! Core types for video-batch-dl

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ItemError;

/// One requested download, as listed in the manifest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// 1-based position in the manifest's `videos` list
    pub position: usize,
    /// Locator of the remote video (`url`)
    pub source_reference: String,
    /// Label used in logs and progress (`title`)
    ///
    /// Independent of the title embedded in the video itself.
    pub display_title: String,
    /// Provenance label, informational only (`author`)
    pub attribution: String,
    /// Directory the downloaded file must land in (`save_directory`)
    pub target_directory: PathBuf,
}

/// A parsed and validated manifest
///
/// Built once by [`crate::manifest::load_manifest`] and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchDescriptor {
    source: PathBuf,
    items: Vec<WorkItem>,
}

impl BatchDescriptor {
    pub(crate) fn new(source: PathBuf, items: Vec<WorkItem>) -> Self {
        Self { source, items }
    }

    /// Path the manifest was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Work items in processing order
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    /// Number of work items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch has no items (never true for a validated manifest)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-item processing state
///
/// ```text
/// Pending -> FetchingMetadata -> { MetadataFailed | DirectoryReady }
/// DirectoryReady -> { DirectoryFailed | Downloading }
/// Downloading -> { Succeeded | DownloadFailed }
/// ```
///
/// `Faulted` is reached from any state when something outside these transitions
/// goes wrong (for example a panic in the fetch tool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Not started yet
    Pending,
    /// Describe invocation in flight
    FetchingMetadata,
    /// Describe invocation failed
    MetadataFailed,
    /// Metadata known, target directory exists
    DirectoryReady,
    /// Target directory could not be created
    DirectoryFailed,
    /// Fetch invocation in flight
    Downloading,
    /// Fetch invocation exited successfully
    Succeeded,
    /// Fetch invocation exited with a non-zero status
    DownloadFailed,
    /// Unexpected failure outside the modeled transitions
    Faulted,
}

impl ItemState {
    /// Whether the item can no longer change state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::MetadataFailed
                | Self::DirectoryFailed
                | Self::Succeeded
                | Self::DownloadFailed
                | Self::Faulted
        )
    }

    /// Whether this is the single successful terminal state
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Final outcome of one work item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemReport {
    /// 1-based position in the manifest
    pub position: usize,
    /// Display title from the manifest
    pub display_title: String,
    /// Source URL from the manifest
    pub source_reference: String,
    /// Terminal state reached
    pub state: ItemState,
    /// Best-effort path of the downloaded file (display only)
    pub output_path: Option<PathBuf>,
    /// Failure reason, `None` on success
    pub error: Option<ItemError>,
}

impl ItemReport {
    /// Report for an item that downloaded successfully
    pub fn succeeded(item: &WorkItem, output_path: PathBuf) -> Self {
        Self {
            position: item.position,
            display_title: item.display_title.clone(),
            source_reference: item.source_reference.clone(),
            state: ItemState::Succeeded,
            output_path: Some(output_path),
            error: None,
        }
    }

    /// Report for an item that ended in a failure state
    pub fn failed(item: &WorkItem, state: ItemState, error: ItemError) -> Self {
        Self {
            position: item.position,
            display_title: item.display_title.clone(),
            source_reference: item.source_reference.clone(),
            state,
            output_path: None,
            error: Some(error),
        }
    }

    /// Whether the item succeeded
    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }
}

/// Aggregate outcome of a batch run
///
/// `succeeded + failed` always equals the number of attempted items, which
/// equals `total` unless the run was interrupted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Number of items in the manifest
    pub total: usize,
    /// Items that downloaded successfully
    pub succeeded: usize,
    /// Items that ended in a failure state
    pub failed: usize,
    /// Whether the run stopped early because of a user interrupt
    pub interrupted: bool,
    /// One report per attempted item, in processing order
    pub reports: Vec<ItemReport>,
}

impl BatchResult {
    /// Empty result for a batch of `total` items
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Count a finished item
    pub fn record(&mut self, report: ItemReport) {
        if report.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.reports.push(report);
    }

    /// Number of items attempted so far
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every item was attempted and every one succeeded
    pub fn all_succeeded(&self) -> bool {
        !self.interrupted && self.succeeded == self.total
    }
}

/// Event emitted during a batch run
///
/// Subscribe with [`crate::BatchOrchestrator::subscribe`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Processing of an item started
    ItemStarted {
        /// 1-based position in the manifest
        position: usize,
        /// Display title from the manifest
        title: String,
        /// Source URL
        url: String,
    },

    /// Describe invocation returned usable metadata
    MetadataFetched {
        /// 1-based position in the manifest
        position: usize,
        /// Title reported by the fetch tool
        title: String,
        /// Uploader reported by the fetch tool
        uploader: String,
        /// Duration in seconds, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<u64>,
    },

    /// Fetch invocation started
    Downloading {
        /// 1-based position in the manifest
        position: usize,
        /// Directory the file is written to
        target_directory: PathBuf,
    },

    /// Item downloaded successfully
    ItemSucceeded {
        /// 1-based position in the manifest
        position: usize,
        /// Best-effort output path
        output_path: PathBuf,
    },

    /// Item failed; the batch continues
    ItemFailed {
        /// 1-based position in the manifest
        position: usize,
        /// Terminal state reached
        state: ItemState,
        /// Error message
        error: String,
    },

    /// Item moved to a new non-terminal state
    ///
    /// Terminal states are reported by [`Event::ItemSucceeded`] and
    /// [`Event::ItemFailed`].
    ItemStateChanged {
        /// 1-based position in the manifest
        position: usize,
        /// State just entered
        state: ItemState,
    },

    /// Every item was attempted
    BatchComplete {
        /// Items that succeeded
        succeeded: usize,
        /// Items that failed
        failed: usize,
        /// Items in the manifest
        total: usize,
    },

    /// The run stopped early on user request
    BatchInterrupted {
        /// Items that succeeded before the interrupt
        succeeded: usize,
        /// Items in the manifest
        total: usize,
    },
}
