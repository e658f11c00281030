//! Section flattening.
//!
//! Stage 2 of the pipeline. Turns raw sections, in either of the two shapes
//! the content files use, into one ordered list of [`FlatRecord`]s.
//!
//! ## Accepted Shapes
//!
//! **Shape A**: a titled section with a `shlokas` list:
//!
//! ```json
//! { "title": "Anger",
//!   "shlokas": [ { "problem": "...", "reference": "Chapter 2 • Verse 63",
//!                  "text": "...", "meaning": "...", "example": "..." } ] }
//! ```
//!
//! **Shape B**: a map from title to verses, with numeric chapter/verse and
//! the Hindi field names:
//!
//! ```json
//! { "Fear": [ { "chapter": 2, "verse": 56, "sanskrit": "...",
//!               "hindi_arth": "...", "udaharan": "..." } ] }
//! ```
//!
//! Either shape may be wrapped in a one-element array (`[ { ... } ]`), which is
//! how the section files are written.
//!
//! ## Malformed Sections
//!
//! A section matching neither shape is skipped in [`ShapeMode::Lenient`] and
//! reported in [`Flattened::skipped`], or fails the whole call in
//! [`ShapeMode::Strict`]. Missing fields are never an error.

use crate::types::FlatRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FlattenError {
    #[error("Section {index} is malformed: {reason}")]
    MalformedSection { index: usize, reason: String },
}

/// What to do with a section that matches neither shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    /// Skip the section and report it.
    #[default]
    Lenient,
    /// Fail with [`FlattenError::MalformedSection`].
    Strict,
}

/// A section left out in lenient mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSection {
    /// Position of the section in the input (0-based).
    pub index: usize,
    pub reason: String,
}

/// Flattener output.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    pub records: Vec<FlatRecord>,
    /// `origins[i]` is the input section record `i` came from.
    pub origins: Vec<usize>,
    pub skipped: Vec<SkippedSection>,
}

/// Flatten raw sections into records, preserving section then verse order.
pub fn flatten(sections: &[Value], mode: ShapeMode) -> Result<Flattened, FlattenError> {
    let mut out = Flattened::default();

    for (index, section) in sections.iter().enumerate() {
        match flatten_section(section) {
            Ok(records) => {
                out.origins.extend(std::iter::repeat_n(index, records.len()));
                out.records.extend(records);
            }
            Err(reason) => match mode {
                ShapeMode::Strict => return Err(FlattenError::MalformedSection { index, reason }),
                ShapeMode::Lenient => out.skipped.push(SkippedSection { index, reason }),
            },
        }
    }

    Ok(out)
}

/// Flatten one section. All-or-nothing: a malformed verse rejects the section.
fn flatten_section(section: &Value) -> Result<Vec<FlatRecord>, String> {
    let section = unwrap_single(section)?;
    let Value::Object(map) = section else {
        return Err(format!("expected an object, found {}", kind(section)));
    };

    if map.contains_key("title") || map.contains_key("shlokas") {
        titled_section(map)
    } else if !map.is_empty() && map.values().all(Value::is_array) {
        verse_map_section(map)
    } else if map.is_empty() {
        Err("empty object".to_string())
    } else {
        Err("neither a titled section nor a title → verses map".to_string())
    }
}

fn unwrap_single(section: &Value) -> Result<&Value, String> {
    match section {
        Value::Array(items) if items.len() == 1 => Ok(&items[0]),
        Value::Array(items) => Err(format!(
            "wrapper array must hold exactly one section, found {}",
            items.len()
        )),
        other => Ok(other),
    }
}

/// Shape A.
fn titled_section(map: &Map<String, Value>) -> Result<Vec<FlatRecord>, String> {
    let title = field(map, "title");
    let shlokas = match map.get("shlokas") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(format!("`shlokas` must be a list, found {}", kind(other))),
    };

    shlokas
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let s = verse_object(s, &title, i)?;
            Ok(FlatRecord {
                section: title.clone(),
                problem: field(s, "problem"),
                reference: field(s, "reference"),
                text: field(s, "text"),
                meaning: field(s, "meaning"),
                example: field(s, "example"),
            })
        })
        .collect()
}

/// Shape B.
fn verse_map_section(map: &Map<String, Value>) -> Result<Vec<FlatRecord>, String> {
    let mut records = Vec::new();
    for (title, verses) in map {
        let Some(verses) = verses.as_array() else {
            return Err(format!("verses of '{}' must be a list", title));
        };
        for (i, v) in verses.iter().enumerate() {
            let v = verse_object(v, title, i)?;
            records.push(FlatRecord {
                section: title.clone(),
                problem: title.clone(),
                reference: chapter_verse_reference(&field(v, "chapter"), &field(v, "verse")),
                text: field(v, "sanskrit"),
                meaning: field(v, "hindi_arth"),
                example: field(v, "udaharan"),
            });
        }
    }
    Ok(records)
}

fn verse_object<'a>(
    value: &'a Value,
    title: &str,
    position: usize,
) -> Result<&'a Map<String, Value>, String> {
    value.as_object().ok_or_else(|| {
        format!(
            "verse {} of '{}' must be an object, found {}",
            position + 1,
            title,
            kind(value)
        )
    })
}

/// Format a reference from chapter and verse numbers.
///
/// - `("2", "63")` → `Chapter 2 • Verse 63`
/// - `("2", "")` → `Chapter 2`
/// - `("", "63")` → `Verse 63`
pub fn chapter_verse_reference(chapter: &str, verse: &str) -> String {
    match (chapter.is_empty(), verse.is_empty()) {
        (false, false) => format!("Chapter {chapter} • Verse {verse}"),
        (false, true) => format!("Chapter {chapter}"),
        (true, false) => format!("Verse {verse}"),
        (true, true) => String::new(),
    }
}

/// Read a scalar field as text. Missing, null, and structured values are empty.
fn field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
