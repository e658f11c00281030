//! # Gita Pages
//!
//! Generates the single HTML page the Android app shows: every Bhagavad Gita
//! shloka from the content files, paginated, with sequential and on-demand
//! narration. The page is self-contained (inline CSS, data and script) so the
//! app's WebView loads it straight from its assets.
//!
//! # Architecture: Four-Stage Pipeline
//!
//! ```text
//! 1. Load      content/*.json  →  raw sections     (serde_json values)
//! 2. Flatten   raw sections    →  flat records     (two input shapes → one)
//! 3. Render    flat records    →  HTML document    (maud + embedded script)
//! 4. Publish   HTML document   →  assets/html/     (write, drop legacy file)
//! ```
//!
//! Stages 1 and 2 are shared by `check`, `flatten` and `export`; only `build`
//! runs all four. [`pipeline`] wires them together.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Stage 1 — reads section files in `NNN-` prefix order |
//! | [`flatten`] | Stage 2 — normalizes both section shapes into [`types::FlatRecord`]s |
//! | [`serialize`] | Escapes records into the script's `SHLOKAS` array literal |
//! | [`render`] | Stage 3 — renders the page with Maud |
//! | [`pagination`] | `Pager`: page arithmetic with wraparound |
//! | [`playback`] | `Player`: narration state machine and step scheduler |
//! | [`voice`] | Voice gender/speed preference and voice selection |
//! | [`publish`] | Stage 4 — writes the document, removes the legacy file |
//! | [`export`] | Plain-text export of the flat records |
//! | [`pipeline`] | Stage orchestration and the aggregate `BuildError` |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`naming`] | `NNN-name` filename ordering |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared types (`FlatRecord`) |
//!
//! # Design Decisions
//!
//! ## One Page, No Runtime Loading
//!
//! Records are embedded in the page as a JavaScript array rather than fetched,
//! because the WebView serves from `file:///android_asset/`, where `fetch` of
//! sibling files is unreliable. Embedding text inside template literals means
//! every free-text field must be escaped; see [`serialize::escape`].
//!
//! ## The Script Mirrors a Rust Model
//!
//! Pagination and playback live in the page script, but their behavior is
//! defined by [`pagination::Pager`] and [`playback::Player`]. Those are plain
//! state machines returning effects, so wraparound, stop/resume and the
//! "only one pending step" rule are unit-tested here, and the browser tests
//! check the script agrees.
//!
//! ## Malformed Content
//!
//! Sections matching neither input shape are skipped and listed by `check`,
//! or rejected outright with `--strict` / `content.shape_mode = "strict"`.

pub mod config;
pub mod content;
pub mod export;
pub mod flatten;
pub mod naming;
pub mod output;
pub mod pagination;
pub mod pipeline;
pub mod playback;
pub mod publish;
pub mod render;
pub mod serialize;
pub mod types;
pub mod voice;

#[cfg(test)]
pub(crate) mod test_helpers;
