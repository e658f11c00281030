//! Serialization of flat records into the page's script block.
//!
//! Records are embedded as JavaScript object literals whose string fields are
//! backtick template literals, so multi-line Sanskrit text survives without
//! `\n` escapes:
//!
//! ```text
//!         {
//!             id: 1,
//!             section: `Anger`,
//!             ...
//!             example: `—`
//!         }
//! ```
//!
//! A template literal inside a `<script>` element has five hazards, all
//! neutralized by [`escape`]:
//!
//! | Input | Output | Why |
//! |-------|--------|-----|
//! | `\`   | `\\`   | escape character itself; must run first |
//! | `` ` `` | `` \` `` | literal delimiter |
//! | `${`  | `\${`  | interpolation |
//! | `</`  | `<\/`  | would close the `<script>` element |
//! | `<!--` | `<\!--` | puts the HTML parser in escaped mode, hiding the real `</script>` |

use crate::types::FlatRecord;

/// Shown instead of an empty meaning or example.
pub const PLACEHOLDER: &str = "—";

/// Escape text for embedding inside a backtick literal in a `<script>` block.
///
/// Backslashes are doubled before any other replacement inserts its own
/// backslash, so escapes added here are never themselves doubled.
pub fn escape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

/// Collapse a multi-line field into one display line.
///
/// Lines are trimmed, blank lines dropped, and the rest joined with single
/// spaces. A result that is empty or only dashes becomes [`PLACEHOLDER`], so
/// the page never shows a blank field.
pub fn clean_text(text: &str) -> String {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let only_dashes = joined
        .chars()
        .all(|c| c.is_whitespace() || matches!(c, '-' | '–' | '—'));
    if only_dashes {
        PLACEHOLDER.to_string()
    } else {
        joined
    }
}

/// Render one record as an object literal with a 1-based `id`.
pub fn render_entry(id: usize, record: &FlatRecord) -> String {
    format!(
        "        {{\n\
         \x20           id: {id},\n\
         \x20           section: `{section}`,\n\
         \x20           problem: `{problem}`,\n\
         \x20           reference: `{reference}`,\n\
         \x20           text: `{text}`,\n\
         \x20           meaning: `{meaning}`,\n\
         \x20           example: `{example}`\n\
         \x20       }}",
        section = escape(&record.section),
        problem = escape(&record.problem),
        reference = escape(&record.reference),
        text = escape(&record.text),
        meaning = escape(&clean_text(&record.meaning)),
        example = escape(&clean_text(&record.example)),
    )
}

/// Render all records, numbered from 1, joined for an array literal body.
pub fn render_entries(records: &[FlatRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| render_entry(i + 1, r))
        .collect::<Vec<_>>()
        .join(",\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Undo the escapes the way a JS template literal reads them.
    fn unescape(escaped: &str) -> String {
        let mut out = String::new();
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    /// True when every backtick and `${` is preceded by an odd run of backslashes.
    fn delimiters_escaped(escaped: &str) -> bool {
        let chars: Vec<char> = escaped.chars().collect();
        (0..chars.len()).all(|i| {
            let hazard = chars[i] == '`' || (chars[i] == '$' && chars.get(i + 1) == Some(&'{'));
            if !hazard {
                return true;
            }
            let run = chars[..i].iter().rev().take_while(|&&c| c == '\\').count();
            run % 2 == 1
        })
    }

    fn random_hazard_string(rng: &mut StdRng) -> String {
        const ALPHABET: [char; 10] = ['\\', '`', '<', '/', '!', '-', '$', '{', 'a', 'श'];
        let len = rng.gen_range(0..24);
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
            .collect()
    }

    #[test]
    fn escape_empty() {
        assert_eq!(escape(""), "");
    }

    #[test]
    fn escape_plain_text_unchanged() {
        assert_eq!(escape("कर्मण्येवाधिकारस्ते"), "कर्मण्येवाधिकारस्ते");
    }

    #[test]
    fn escape_each_hazard() {
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape("a`b"), r"a\`b");
        assert_eq!(escape("${x}"), r"\${x}");
        assert_eq!(escape("</script>"), r"<\/script>");
        assert_eq!(escape("<!--<script>"), r"<\!--<script>");
    }

    #[test]
    fn escape_comment_opener_reads_back() {
        let once = escape("a <!-- b --> c");
        assert_eq!(once, r"a <\!-- b --> c");
        assert_eq!(unescape(&once), "a <!-- b --> c");
    }

    #[test]
    fn escape_backslash_before_delimiter() {
        // The backslash is doubled, then the backtick gets its own escape.
        assert_eq!(escape(r"\`"), r"\\\`");
    }

    #[test]
    fn escape_twice_only_doubles_backslashes() {
        let once = escape("say `hi` </b>");
        assert_eq!(once, r"say \`hi\` <\/b>");
        let twice = escape(&once);
        assert_eq!(twice, r"say \\\`hi\\\` <\\/b>");
        assert_eq!(unescape(&twice), once);
    }

    #[test]
    fn escape_never_leaves_hazards() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let input = random_hazard_string(&mut rng);
            let once = escape(&input);
            assert!(!once.contains("</"), "closing tag left in {once:?}");
            assert!(!once.contains("<!--"), "comment opener left in {once:?}");
            assert!(delimiters_escaped(&once), "unescaped delimiter in {once:?}");
            assert_eq!(unescape(&once), input);

            let twice = escape(&once);
            assert!(!twice.contains("</"));
            assert!(!twice.contains("<!--"));
            assert!(delimiters_escaped(&twice));
            assert_eq!(unescape(&twice), once);
        }
    }

    #[test]
    fn clean_text_joins_lines() {
        assert_eq!(clean_text("  first line \n\n   second\n"), "first line second");
    }

    #[test]
    fn clean_text_placeholder_for_blank_or_dash() {
        assert_eq!(clean_text(""), PLACEHOLDER);
        assert_eq!(clean_text("  \n \n"), PLACEHOLDER);
        assert_eq!(clean_text("-"), PLACEHOLDER);
        assert_eq!(clean_text(" — "), PLACEHOLDER);
    }

    #[test]
    fn clean_text_keeps_dash_inside_text() {
        assert_eq!(clean_text("duty - not fruit"), "duty - not fruit");
    }

    #[test]
    fn render_entry_layout() {
        let record = FlatRecord {
            section: "Anger".into(),
            problem: "Anger".into(),
            reference: "Chapter 2 • Verse 3".into(),
            text: "line one\nline two".into(),
            meaning: "meaning".into(),
            example: String::new(),
        };
        let entry = render_entry(1, &record);
        assert!(entry.starts_with("        {\n            id: 1,\n"));
        assert!(entry.contains("            section: `Anger`,\n"));
        assert!(entry.contains("text: `line one\nline two`,"));
        assert!(entry.contains("example: `—`\n"));
        assert!(entry.ends_with("\n        }"));
    }

    #[test]
    fn render_entry_escapes_all_fields() {
        let record = FlatRecord {
            section: "a`b".into(),
            problem: "</script>".into(),
            ..Default::default()
        };
        let entry = render_entry(3, &record);
        assert!(entry.contains(r"section: `a\`b`"));
        assert!(entry.contains(r"problem: `<\/script>`"));
        assert!(!entry.contains("</"));
    }

    #[test]
    fn render_entries_numbers_from_one() {
        let records = vec![FlatRecord::default(), FlatRecord::default()];
        let body = render_entries(&records);
        assert!(body.contains("id: 1,"));
        assert!(body.contains("id: 2,"));
        assert_eq!(body.matches("},\n        {").count(), 1);
    }

    #[test]
    fn render_entries_empty() {
        assert_eq!(render_entries(&[]), "");
    }
}
