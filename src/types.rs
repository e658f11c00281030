//! Shared types used across all pipeline stages.
//!
//! A [`FlatRecord`] is what the flattener produces and what every later stage
//! (serializer, renderer, exporter, CLI output) consumes. It is also the shape
//! printed by `gita-pages flatten`, so it round-trips through JSON.

use serde::{Deserialize, Serialize};

/// One shloka, normalized from either raw section shape.
///
/// All six fields are always present. Missing input fields become empty
/// strings; display-time placeholders are applied later by
/// [`clean_text`](crate::serialize::clean_text).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Title of the section this record came from
    pub section: String,
    /// Problem statement the shloka answers
    pub problem: String,
    /// Human-readable reference, e.g. `Chapter 2 • Verse 63`
    pub reference: String,
    /// Sanskrit source text (line breaks preserved)
    pub text: String,
    pub meaning: String,
    pub example: String,
}
