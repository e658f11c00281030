//! Plain-text export of flat records.
//!
//! One block per record: the six fields on their own lines, then a dashed
//! separator. Field text is written as-is, without display placeholders.

use crate::types::FlatRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default file name for `gita-pages export`.
pub const DEFAULT_EXPORT_FILE: &str = "exported_shlokas.txt";

const SEPARATOR: &str = "\n-----------------\n\n";

/// Format records as the export text.
pub fn format_export(records: &[FlatRecord]) -> String {
    let mut out = String::new();
    for r in records {
        for field in [
            &r.section,
            &r.problem,
            &r.reference,
            &r.text,
            &r.meaning,
            &r.example,
        ] {
            out.push_str(field);
            out.push('\n');
        }
        out.push_str(SEPARATOR);
    }
    out
}

/// Write the export to `path` and return its absolute path.
pub fn export_to_txt(records: &[FlatRecord], path: &Path) -> io::Result<PathBuf> {
    let mut file = fs::File::create(path)?;
    file.write_all(format_export(records).as_bytes())?;
    file.flush()?;
    fs::canonicalize(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, records};
    use tempfile::TempDir;

    #[test]
    fn six_lines_then_separator() {
        let text = format_export(&[record("Anger")]);
        assert_eq!(
            text,
            "Test\nAnger\nChapter 1 • Verse 1\nAnger text\nAnger meaning\nAnger example\n\
             \n-----------------\n\n"
        );
    }

    #[test]
    fn empty_fields_keep_their_line() {
        let mut r = record("x");
        r.example = String::new();
        let text = format_export(&[r]);
        assert!(text.contains("x meaning\n\n\n-----------------"));
    }

    #[test]
    fn records_in_order() {
        let text = format_export(&records(3));
        let a = text.find("r0 text").unwrap();
        let b = text.find("r1 text").unwrap();
        let c = text.find("r2 text").unwrap();
        assert!(a < b && b < c);
        assert_eq!(text.matches("-----------------").count(), 3);
    }

    #[test]
    fn writes_file_and_returns_absolute_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_EXPORT_FILE);
        let written = export_to_txt(&records(2), &path).unwrap();
        assert!(written.is_absolute());
        assert_eq!(
            fs::read_to_string(&written).unwrap(),
            format_export(&records(2))
        );
    }

    #[test]
    fn no_records_writes_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.txt");
        export_to_txt(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
