//! # video-batch-dl
//!
//! Batch video downloader driven by a YAML manifest. The heavy lifting
//! (network, formats, subtitles, muxing) is delegated to `yt-dlp`; this crate
//! validates the manifest, prepares target directories, runs the tool once per
//! video and reports what happened.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use video_batch_dl::{BatchOrchestrator, CliFetchTool, Config, FetchTool, load_manifest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let tool = CliFetchTool::from_config(&config.tools)?;
//!     println!("Using yt-dlp version: {}", tool.version().await?);
//!
//!     let batch = load_manifest(Path::new("videos.yaml"))?;
//!     let orchestrator = BatchOrchestrator::new(Arc::new(tool), Arc::new(config));
//!
//!     let result = orchestrator
//!         .run_until(&batch, video_batch_dl::wait_for_interrupt())
//!         .await;
//!     println!("{}/{} videos downloaded", result.succeeded, result.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// External fetch tool (yt-dlp) integration
pub mod fetcher;
/// Manifest loading and validation
pub mod manifest;
/// Sequential batch processing
pub mod orchestrator;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{Config, FetchPolicy, ToolsConfig};
pub use error::{Error, ItemError, ManifestError, Result};
pub use fetcher::{
    CliFetchTool, FetchOutput, FetchRequest, FetchTool, NoOpFetchTool, VideoMetadata,
};
pub use manifest::{load_manifest, parse_manifest};
pub use orchestrator::BatchOrchestrator;
pub use types::{BatchDescriptor, BatchResult, Event, ItemReport, ItemState, WorkItem};

/// Wait until the user asks the process to stop.
///
/// - **Unix:** resolves on SIGINT (Ctrl+C) or SIGTERM, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** resolves on Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Pass the returned future to [`BatchOrchestrator::run_until`].
#[cfg(unix)]
pub async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Wait until the user asks the process to stop (Ctrl+C).
#[cfg(not(unix))]
pub async fn wait_for_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            // Never resolve: an unusable signal handler must not look like an interrupt
            std::future::pending::<()>().await;
        }
    }
}
