//! Manifest loading and validation
//!
//! A manifest is a YAML document listing the videos of one batch:
//!
//! ```yaml
//! videos:
//!   - url: https://www.youtube.com/watch?v=video1_id
//!     title: Learning Python Basics
//!     author: CodeMaster
//!     save_directory: /home/user/Videos/PythonTutorials
//! ```
//!
//! Validation is total and happens before anything else: a manifest is either
//! accepted as a whole or rejected with a [`ManifestError`], and rejection never
//! has side effects. Target directories are not looked at here.

use crate::error::ManifestError;
use crate::types::{BatchDescriptor, WorkItem};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key holding the list of videos at the document root
pub const VIDEOS_KEY: &str = "videos";

/// Keys every video entry must carry, sorted
pub const REQUIRED_KEYS: [&str; 4] = ["author", "save_directory", "title", "url"];

/// Load and validate a manifest file
///
/// # Errors
///
/// - [`ManifestError::NotFound`] if `path` does not exist
/// - [`ManifestError::Read`] if the file cannot be read
/// - [`ManifestError::Parse`] if the file is not valid YAML
/// - [`ManifestError::Schema`] / [`ManifestError::MissingFields`] if the
///   document does not describe a list of videos
pub fn load_manifest(path: &Path) -> Result<BatchDescriptor, ManifestError> {
    info!(path = %path.display(), "Reading configuration from: {}", path.display());

    if !path.exists() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let batch = parse_manifest(&text, path)?;
    info!(count = batch.len(), "Found {} videos in configuration", batch.len());
    Ok(batch)
}

/// Validate manifest text
///
/// `origin` is only used in error messages and recorded on the descriptor.
///
/// # Errors
///
/// Same as [`load_manifest`], minus the file system errors.
pub fn parse_manifest(text: &str, origin: &Path) -> Result<BatchDescriptor, ManifestError> {
    let document: Value = serde_yaml::from_str(text).map_err(|e| ManifestError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    let Value::Mapping(root) = document else {
        return Err(ManifestError::Schema(
            "configuration must be a mapping".to_string(),
        ));
    };

    let Some(videos) = root.get(VIDEOS_KEY) else {
        return Err(ManifestError::Schema(format!(
            "configuration must contain a '{VIDEOS_KEY}' key"
        )));
    };

    let Value::Sequence(entries) = videos else {
        return Err(ManifestError::Schema(format!(
            "'{VIDEOS_KEY}' must be a list"
        )));
    };

    if entries.is_empty() {
        return Err(ManifestError::Schema(format!(
            "'{VIDEOS_KEY}' must list at least one video"
        )));
    }

    let items = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index + 1, entry))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(origin = %origin.display(), count = items.len(), "manifest validated");
    Ok(BatchDescriptor::new(origin.to_path_buf(), items))
}

fn parse_entry(position: usize, entry: &Value) -> Result<WorkItem, ManifestError> {
    let Value::Mapping(fields) = entry else {
        return Err(ManifestError::Schema(format!(
            "video entry {position} must be a mapping"
        )));
    };

    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !fields.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ManifestError::MissingFields {
            position,
            fields: missing,
        });
    }

    let url = string_field(fields, position, "url")?;
    if url.trim().is_empty() {
        return Err(ManifestError::Schema(format!(
            "video entry {position}: 'url' must not be empty"
        )));
    }

    Ok(WorkItem {
        position,
        source_reference: url.trim().to_string(),
        display_title: string_field(fields, position, "title")?,
        attribution: string_field(fields, position, "author")?,
        target_directory: PathBuf::from(string_field(fields, position, "save_directory")?),
    })
}

/// Scalar field as text
///
/// YAML reads `title: 1984` as a number, so numbers and booleans are accepted
/// in their written form. Null, lists and mappings are rejected.
fn string_field(fields: &Mapping, position: usize, key: &str) -> Result<String, ManifestError> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Number(value)) => Ok(value.to_string()),
        Some(Value::Bool(value)) => Ok(value.to_string()),
        _ => Err(ManifestError::Schema(format!(
            "video entry {position}: '{key}' must be a string"
        ))),
    }
}
