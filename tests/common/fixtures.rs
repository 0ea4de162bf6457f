//! Manifest fixtures

use std::path::{Path, PathBuf};

/// One `videos` entry
#[derive(Debug, Clone)]
pub struct EntrySpec {
    pub url: String,
    pub title: String,
    pub author: String,
    pub save_directory: PathBuf,
}

impl EntrySpec {
    /// Entry downloading `url` into `dir`
    pub fn new(url: &str, title: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            author: "CodeMaster".to_string(),
            save_directory: dir.into(),
        }
    }
}

/// Render entries as a manifest document
pub fn manifest_yaml(entries: &[EntrySpec]) -> String {
    let mut yaml = String::from("videos:\n");
    for entry in entries {
        yaml.push_str(&format!(
            "  - url: \"{}\"\n    title: \"{}\"\n    author: \"{}\"\n    save_directory: \"{}\"\n",
            entry.url,
            entry.title,
            entry.author,
            entry.save_directory.display()
        ));
    }
    yaml
}

/// Write entries as `videos.yaml` inside `dir` and return its path
pub fn write_manifest(dir: &Path, entries: &[EntrySpec]) -> PathBuf {
    let path = dir.join("videos.yaml");
    std::fs::write(&path, manifest_yaml(entries)).expect("failed to write manifest");
    path
}

/// `count` entries with URLs `https://example.com/watch?v=<n>` and one
/// directory per entry under `root`
pub fn numbered_entries(root: &Path, count: usize) -> Vec<EntrySpec> {
    (1..=count)
        .map(|n| {
            EntrySpec::new(
                &format!("https://example.com/watch?v={n}"),
                &format!("Video {n}"),
                root.join(format!("dir{n}")),
            )
        })
        .collect()
}

/// Manifest where the second entry lacks `author` and `url`
pub const MISSING_FIELDS_YAML: &str = r#"
videos:
  - url: https://www.youtube.com/watch?v=video1_id
    title: Learning Python Basics
    author: CodeMaster
    save_directory: SAVE_DIR
  - title: Advanced Data Structures
    save_directory: SAVE_DIR
"#;
