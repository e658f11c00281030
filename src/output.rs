//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each section leads
//! with its positional index and title, each shloka with its problem and
//! reference. Section files are shown as secondary context via indented
//! `Source:` lines, so the output reads as a content inventory while still
//! tracing back to the files.
//!
//! # Output Format
//!
//! ## Check / Build
//!
//! ```text
//! Sections
//! 001 क्रोध (Anger) (2 shlokas)
//!     Source: 001-anger.json
//!     001 बात-बात पर गुस्सा आता है (Chapter 2 • Verse 63)
//!     002 अपमान सहन नहीं होता (Chapter 2 • Verse 56)
//!
//! Skipped
//!     Section 4: expected an object, found a number
//!         Source: 020-broken.json
//!
//! 5 shlokas in 3 sections, 3 pages of 2
//! ```
//!
//! ## Publish
//!
//! ```text
//! Wrote android/app/src/main/assets/html/gita_shlokas.html (48213 bytes)
//!     Legacy gita_problems.html: removed
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure —
//! no I/O, no side effects.

use crate::content::ContentStore;
use crate::flatten::Flattened;
use crate::publish::{LegacyStatus, PublishReport};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// File name of a source path, falling back to the full path.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// One displayed section: consecutive records sharing an input section and title.
struct SectionGroup<'a> {
    title: &'a str,
    origin: usize,
    records: Vec<(usize, &'a crate::types::FlatRecord)>,
}

fn group_sections(flattened: &Flattened) -> Vec<SectionGroup<'_>> {
    let mut groups: Vec<SectionGroup<'_>> = Vec::new();
    for (i, record) in flattened.records.iter().enumerate() {
        let origin = flattened.origins.get(i).copied().unwrap_or(0);
        let same = groups
            .last()
            .map(|g| g.origin == origin && g.title == record.section)
            .unwrap_or(false);
        if !same {
            groups.push(SectionGroup {
                title: &record.section,
                origin,
                records: Vec::new(),
            });
        }
        if let Some(group) = groups.last_mut() {
            group.records.push((i, record));
        }
    }
    groups
}

// ============================================================================
// Inventory (check, build)
// ============================================================================

/// Format the loaded content: sections with their shlokas, skipped sections,
/// and a summary line.
pub fn format_inventory(store: &ContentStore, flattened: &Flattened, page_size: usize) -> Vec<String> {
    let mut lines = Vec::new();

    let groups = group_sections(flattened);
    lines.push("Sections".to_string());
    for (pos, group) in groups.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(pos + 1),
            group.title,
            plural(group.records.len(), "shloka", "shlokas")
        ));
        if let Some(source) = store.source_of(group.origin) {
            lines.push(format!("{}Source: {}", indent(1), source_name(source)));
        }
        for (n, (_, record)) in group.records.iter().enumerate() {
            lines.push(format!(
                "{}{} {} ({})",
                indent(1),
                format_index(n + 1),
                record.problem,
                record.reference
            ));
        }
    }

    if !flattened.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &flattened.skipped {
            lines.push(format!(
                "{}Section {}: {}",
                indent(1),
                skipped.index + 1,
                skipped.reason
            ));
            if let Some(source) = store.source_of(skipped.index) {
                lines.push(format!("{}Source: {}", indent(2), source_name(source)));
            }
        }
    }

    let total = flattened.records.len();
    let pages = total.div_ceil(page_size.max(1));
    lines.push(String::new());
    lines.push(format!(
        "{} in {}, {} of {}",
        plural(total, "shloka", "shlokas"),
        plural(groups.len(), "section", "sections"),
        plural(pages, "page", "pages"),
        page_size
    ));
    lines
}

pub fn print_inventory(store: &ContentStore, flattened: &Flattened, page_size: usize) {
    for line in format_inventory(store, flattened, page_size) {
        println!("{}", line);
    }
}

// ============================================================================
// Publish
// ============================================================================

pub fn format_publish_report(report: &PublishReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Wrote {} ({} bytes)",
        report.path.display(),
        report.bytes
    )];
    if let Some(legacy) = &report.legacy {
        lines.push(format!(
            "{}Legacy {}: {}",
            indent(1),
            source_name(legacy),
            report.legacy_status
        ));
    }
    lines
}

pub fn print_publish_report(report: &PublishReport) {
    for line in format_publish_report(report) {
        println!("{}", line);
    }
    if let LegacyStatus::NotRemoved(_) = report.legacy_status {
        eprintln!("warning: legacy output left in place");
    }
}

// ============================================================================
// Export
// ============================================================================

pub fn format_export_report(path: &Path, count: usize) -> Vec<String> {
    vec![format!(
        "Exported {} → {}",
        plural(count, "shloka", "shlokas"),
        path.display()
    )]
}

pub fn print_export_report(path: &Path, count: usize) {
    for line in format_export_report(path, count) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{ShapeMode, SkippedSection, flatten};
    use crate::test_helpers::{record, setup_fixtures};
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn inventory_of_fixtures() {
        let tmp = setup_fixtures();
        let store = crate::content::load_sections(tmp.path()).unwrap();
        let flattened = flatten(&store.sections, ShapeMode::Strict).unwrap();
        let lines = format_inventory(&store, &flattened, 2);

        assert_eq!(lines[0], "Sections");
        assert_eq!(lines[1], "001 क्रोध (Anger) (2 shlokas)");
        assert_eq!(lines[2], "    Source: 001-anger.json");
        assert_eq!(
            lines[3],
            "    001 बात-बात पर गुस्सा आता है (Chapter 2 • Verse 63)"
        );
        assert!(lines.contains(&"003 कर्तव्य (Duty) (1 shloka)".to_string()));
        assert!(lines.contains(&"    Source: 002-fear.json".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "5 shlokas in 3 sections, 3 pages of 2"
        );
        assert!(!lines.contains(&"Skipped".to_string()));
    }

    #[test]
    fn inventory_reports_skipped_with_source() {
        let store = ContentStore {
            sections: vec![serde_json::json!(1), serde_json::json!(2)],
            sources: vec![PathBuf::from("c/001-a.json"), PathBuf::from("c/002-b.json")],
        };
        let flattened = Flattened {
            records: vec![record("Anger")],
            origins: vec![0],
            skipped: vec![SkippedSection {
                index: 1,
                reason: "expected an object, found a number".to_string(),
            }],
        };
        let lines = format_inventory(&store, &flattened, 2);
        let at = lines.iter().position(|l| l == "Skipped").unwrap();
        assert_eq!(
            lines[at + 1],
            "    Section 2: expected an object, found a number"
        );
        assert_eq!(lines[at + 2], "        Source: 002-b.json");
        assert_eq!(lines.last().unwrap(), "1 shloka in 1 section, 1 page of 2");
    }

    #[test]
    fn same_title_from_different_files_stays_separate() {
        let flattened = Flattened {
            records: vec![record("a"), record("b")],
            origins: vec![0, 1],
            skipped: Vec::new(),
        };
        assert_eq!(group_sections(&flattened).len(), 2);
    }

    #[test]
    fn publish_report_lines() {
        let report = PublishReport {
            path: PathBuf::from("out/gita_shlokas.html"),
            bytes: 120,
            legacy: Some(PathBuf::from("out/gita_problems.html")),
            legacy_status: LegacyStatus::Removed,
        };
        assert_eq!(
            format_publish_report(&report),
            vec![
                "Wrote out/gita_shlokas.html (120 bytes)".to_string(),
                "    Legacy gita_problems.html: removed".to_string(),
            ]
        );
    }

    #[test]
    fn publish_report_without_legacy() {
        let report = PublishReport {
            path: PathBuf::from("a.html"),
            bytes: 1,
            legacy: None,
            legacy_status: LegacyStatus::NotConfigured,
        };
        assert_eq!(format_publish_report(&report).len(), 1);
    }

    #[test]
    fn export_report_line() {
        assert_eq!(
            format_export_report(Path::new("/tmp/x.txt"), 1),
            vec!["Exported 1 shloka → /tmp/x.txt".to_string()]
        );
    }
}
