//! Shared test utilities for the gita-pages test suite.
//!
//! Fixture setup plus small record builders for tests that only care about
//! one or two fields.

use std::path::Path;
use tempfile::TempDir;

use crate::content::load_sections;
use crate::flatten::{ShapeMode, flatten};
use crate::types::FlatRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// Load and strictly flatten a content directory.
pub fn flatten_fixtures(content: &Path) -> Vec<FlatRecord> {
    let store = load_sections(content).unwrap();
    flatten(&store.sections, ShapeMode::Strict).unwrap().records
}

/// A record with the given text, for tests that only care about one field.
pub fn record(problem: &str) -> FlatRecord {
    FlatRecord {
        section: "Test".to_string(),
        problem: problem.to_string(),
        reference: "Chapter 1 • Verse 1".to_string(),
        text: format!("{problem} text"),
        meaning: format!("{problem} meaning"),
        example: format!("{problem} example"),
    }
}

/// `n` distinct records named `r0`, `r1`, ...
pub fn records(n: usize) -> Vec<FlatRecord> {
    (0..n).map(|i| record(&format!("r{i}"))).collect()
}
