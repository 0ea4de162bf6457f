//! Error types for video-batch-dl
//!
//! Errors are split by the boundary at which they stop:
//! - [`Error`] terminates the process (startup, manifest, interruption)
//! - [`ManifestError`] describes why a manifest was rejected before any work started
//! - [`ItemError`] is recorded against a single work item and never escapes the batch

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for video-batch-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit code for fatal errors (startup, manifest, unexpected)
pub const EXIT_FAILURE: u8 = 1;

/// Process exit code when the user interrupts a running batch
pub const EXIT_INTERRUPTED: u8 = 130;

/// Main error type for video-batch-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The fetch tool is missing or not working; nothing was attempted
    #[error("{0}")]
    Startup(String),

    /// Manifest could not be loaded or failed validation
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fetch.max_height")
        key: Option<String>,
    },

    /// External tool execution failed (spawn error, non-zero exit, bad output)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported by the configured fetch tool
    #[error("not supported: {0}")]
    NotSupported(String),

    /// The batch was interrupted by the user
    #[error("download interrupted by user")]
    Interrupted,
}

/// Reasons a manifest is rejected
///
/// Any of these is raised before the first work item starts, so a rejected
/// manifest never has side effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The manifest path does not point at an existing file
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("failed to read {}: {reason}", path.display())]
    Read {
        /// Path that was requested
        path: PathBuf,
        /// Underlying OS error message
        reason: String,
    },

    /// The document is not valid YAML
    #[error("invalid YAML format in {}: {message}", path.display())]
    Parse {
        /// Path that was parsed
        path: PathBuf,
        /// Message reported by the YAML parser
        message: String,
    },

    /// The document is valid YAML but does not have the expected shape
    #[error("{0}")]
    Schema(String),

    /// A video entry lacks one or more required keys
    #[error("video entry {position} missing required keys: {}", fields.join(", "))]
    MissingFields {
        /// 1-based position of the entry in the `videos` list
        position: usize,
        /// Every missing key, sorted
        fields: Vec<String>,
    },
}

impl ManifestError {
    /// Whether this error is a schema violation (as opposed to I/O or syntax)
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_) | Self::MissingFields { .. })
    }
}

/// Failure of a single work item
///
/// Recorded in the item's report; the batch moves on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The describe invocation failed or returned unusable output
    #[error("{0}")]
    Metadata(String),

    /// The target directory could not be created
    #[error("cannot create directory {}: {reason}", path.display())]
    Directory {
        /// Directory that was requested
        path: PathBuf,
        /// Why creation failed
        reason: String,
    },

    /// The fetch invocation exited with a non-zero status
    #[error("{diagnostic}")]
    Fetch {
        /// Diagnostic text written by the fetch tool
        diagnostic: String,
    },

    /// Anything not covered above, including panics in the fetch tool
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Machine-readable error code, used as a structured logging field
    pub fn error_code(&self) -> &str {
        match self {
            Error::Startup(_) => "startup_error",
            Error::Manifest(e) => e.error_code(),
            Error::Config { .. } => "config_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::NotSupported(_) => "not_supported",
            Error::Interrupted => "interrupted",
        }
    }

    /// Process exit code for this error when it terminates the program
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }
}

impl ManifestError {
    /// Machine-readable error code
    pub fn error_code(&self) -> &str {
        match self {
            ManifestError::NotFound { .. } => "manifest_not_found",
            ManifestError::Read { .. } => "manifest_read_error",
            ManifestError::Parse { .. } => "manifest_parse_error",
            ManifestError::Schema(_) | ManifestError::MissingFields { .. } => {
                "manifest_schema_error"
            }
        }
    }
}

impl ItemError {
    /// Machine-readable error code
    pub fn error_code(&self) -> &str {
        match self {
            ItemError::Metadata(_) => "metadata_error",
            ItemError::Directory { .. } => "directory_error",
            ItemError::Fetch { .. } => "fetch_error",
            ItemError::Unexpected(_) => "unexpected_item_error",
        }
    }
}
