//! Filename ordering for the `NNN-name` convention used by section files.
//!
//! Section files in a content directory carry an optional numeric prefix that
//! fixes their order on the page:
//!
//! ```text
//! content/
//! ├── 001-anger.json     → 1
//! ├── 002-fear.json      → 2
//! ├── 010-duty.json      → 10 (gaps are fine)
//! └── drafts.json        → unnumbered, sorted after all numbered files
//! ```

use std::cmp::Ordering;

/// Number prefix of an entry name like `010-self-doubt`.
///
/// - `"010-self-doubt"` → `Some(10)`
/// - `"001"` → `Some(1)`
/// - `"drafts"`, `"wip-drafts"` → `None`
pub fn entry_number(name: &str) -> Option<u32> {
    let prefix = name.split_once('-').map_or(name, |(prefix, _)| prefix);
    prefix.parse::<u32>().ok()
}

/// Ordering for section file stems: numbered first by number, then
/// unnumbered; ties broken by the full stem so the order is total.
pub fn compare_entry_names(a: &str, b: &str) -> Ordering {
    let key = |s: &str| entry_number(s).unwrap_or(u32::MAX);
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}
