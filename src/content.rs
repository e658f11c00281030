//! Content loading.
//!
//! Stage 1 of the pipeline. Reads raw sections from JSON. The content path is
//! either a single file or a directory of section files:
//!
//! ```text
//! content/
//! ├── config.toml          # Site configuration (optional, not a section)
//! ├── 001-anger.json       # [ { "title": "Anger", "shlokas": [...] } ]
//! ├── 002-fear.json        # [ { "Fear": [ { "chapter": 2, ... } ] } ]
//! └── 010-duty.json
//! ```
//!
//! Files are read in `NNN-` prefix order. A file holding a JSON array
//! contributes each element as one section; any other value is one section.
//! Sections are not interpreted here: shape detection belongs to
//! [`flatten`](crate::flatten).

use crate::naming::compare_entry_names;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content path not found: {0}")]
    NotFound(PathBuf),
    #[error("No section files (*.json) in {0}")]
    Empty(PathBuf),
}

/// Raw sections in load order, with the file each one came from.
#[derive(Debug, Default)]
pub struct ContentStore {
    pub sections: Vec<Value>,
    /// `sources[i]` is the file section `i` was read from.
    pub sources: Vec<PathBuf>,
}

impl ContentStore {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn source_of(&self, index: usize) -> Option<&Path> {
        self.sources.get(index).map(PathBuf::as_path)
    }

    fn push_file(&mut self, path: &Path) -> Result<(), ContentError> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text).map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Array(items) => {
                for item in items {
                    self.sections.push(item);
                    self.sources.push(path.to_path_buf());
                }
            }
            other => {
                self.sections.push(other);
                self.sources.push(path.to_path_buf());
            }
        }
        Ok(())
    }
}

/// Load raw sections from a JSON file or a directory of JSON files.
pub fn load_sections(path: &Path) -> Result<ContentStore, ContentError> {
    let mut store = ContentStore::default();
    if path.is_file() {
        store.push_file(path)?;
        return Ok(store);
    }
    if !path.is_dir() {
        return Err(ContentError::NotFound(path.to_path_buf()));
    }

    let files = section_files(path)?;
    if files.is_empty() {
        return Err(ContentError::Empty(path.to_path_buf()));
    }
    for file in &files {
        store.push_file(file)?;
    }
    Ok(store)
}

/// `*.json` files directly inside `dir`, in `NNN-` prefix order.
fn section_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if entry.file_type().is_file() && is_json {
            files.push(path.to_path_buf());
        }
    }

    files.sort_by(|a, b| compare_entry_names(&file_stem(a), &file_stem(b)));
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_fixtures;
    use tempfile::TempDir;

    #[test]
    fn loads_fixture_directory_in_prefix_order() {
        let tmp = setup_fixtures();
        let store = load_sections(tmp.path()).unwrap();
        let files: Vec<String> = store.sources.iter().map(|p| file_stem(p)).collect();
        assert_eq!(files, vec!["001-anger", "002-fear", "010-duty"]);
    }

    #[test]
    fn wrapper_array_file_is_one_section() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("001-a.json"),
            r#"[ { "title": "A", "shlokas": [] } ]"#,
        )
        .unwrap();
        let store = load_sections(tmp.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.sections[0].is_object());
    }

    #[test]
    fn array_file_contributes_each_element() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("all.json");
        fs::write(&file, r#"[ { "title": "A" }, { "title": "B" }, [ { "title": "C" } ] ]"#)
            .unwrap();
        let store = load_sections(&file).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.source_of(2), Some(file.as_path()));
    }

    #[test]
    fn object_file_is_one_section() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("fear.json"), r#"{ "Fear": [] }"#).unwrap();
        assert_eq!(load_sections(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn ignores_non_json_and_nested_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "").unwrap();
        fs::write(tmp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("drafts")).unwrap();
        fs::write(tmp.path().join("drafts/001-x.json"), "{}").unwrap();
        fs::write(tmp.path().join("001-a.json"), r#"{ "title": "A" }"#).unwrap();
        assert_eq!(load_sections(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn empty_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_sections(tmp.path()),
            Err(ContentError::Empty(_))
        ));
    }

    #[test]
    fn missing_path_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_sections(&tmp.path().join("nope")),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn invalid_json_names_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("001-bad.json"), "{ not json").unwrap();
        let err = load_sections(tmp.path()).unwrap_err();
        assert!(matches!(err, ContentError::Json { .. }));
        assert!(err.to_string().contains("001-bad.json"));
    }
}
