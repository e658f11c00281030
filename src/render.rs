//! HTML page rendering.
//!
//! Stage 3 of the pipeline. Takes the flat records and produces one complete,
//! self-contained document: inline CSS, markup, the record data and the player
//! script. Nothing is loaded at runtime, so the file works from
//! `file:///android_asset/` inside the app's WebView.
//!
//! ## Document Layout
//!
//! ```text
//! header        heading + subtitle
//! .controls     Start Stop Pause Resume Next Random Read Exit
//! .voice-controls   Voice: female   Speed: medium
//! #content      first page of .frame elements (re-rendered by the script)
//! nav.pager     ⬅ previous   Page 1 / N   next ➡
//! <script>      const SHLOKAS = [...]; const CONFIG = {...}; player.js
//! ```
//!
//! The first page is rendered here as well as by the script, so the page reads
//! correctly before (or without) script execution.
//!
//! ## Script Data
//!
//! Records go through [`render_entries`] (template-literal escaping). `CONFIG`
//! is JSON with `</` rewritten to the equivalent `<\/` and `<!--` to
//! `<\u0021--`, so neither can close the `<script>` element early.

use crate::config::{self, LabelsConfig, SiteConfig};
use crate::pagination::{Pager, PagerError};
use crate::serialize::{PLACEHOLDER, clean_text, render_entries};
use crate::types::FlatRecord;
use crate::voice::{VoiceGender, VoicePreference, VoiceSpeed};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Pagination error: {0}")]
    Pager(#[from] PagerError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const PLAYER_JS: &str = include_str!("../static/player.js");

/// `localStorage` keys for the reader's voice choice.
pub const GENDER_STORAGE_KEY: &str = "voice_gender";
pub const SPEED_STORAGE_KEY: &str = "voice_speed";

/// Settings handed to the player script as `CONFIG`.
#[derive(Debug, Serialize)]
struct ScriptConfig<'a> {
    page_size: usize,
    dwell_ms: u64,
    lang: &'a str,
    placeholder: &'static str,
    labels: &'a LabelsConfig,
    voice: ScriptVoice<'a>,
}

#[derive(Debug, Serialize)]
struct ScriptVoice<'a> {
    default_gender: VoiceGender,
    default_speed: VoiceSpeed,
    speeds: Vec<&'static str>,
    rates: BTreeMap<&'static str, f32>,
    female_keywords: &'a [String],
    male_keywords: &'a [String],
    storage_keys: StorageKeys,
}

#[derive(Debug, Serialize)]
struct StorageKeys {
    gender: &'static str,
    speed: &'static str,
}

impl<'a> ScriptConfig<'a> {
    fn new(config: &'a SiteConfig) -> Self {
        Self {
            page_size: config.page.page_size,
            dwell_ms: config.dwell_ms(),
            lang: &config.page.lang,
            placeholder: PLACEHOLDER,
            labels: &config.labels,
            voice: ScriptVoice {
                default_gender: config.voice.default_gender,
                default_speed: config.voice.default_speed,
                speeds: VoiceSpeed::ALL.iter().map(|s| s.key()).collect(),
                rates: VoiceSpeed::ALL.iter().map(|s| (s.key(), s.rate())).collect(),
                female_keywords: &config.voice.female_keywords,
                male_keywords: &config.voice.male_keywords,
                storage_keys: StorageKeys {
                    gender: GENDER_STORAGE_KEY,
                    speed: SPEED_STORAGE_KEY,
                },
            },
        }
    }
}

/// Render the complete document.
pub fn render(records: &[FlatRecord], config: &SiteConfig) -> Result<Markup, RenderError> {
    let pager = Pager::new(records.len(), config.page.page_size)?;
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    let script = script_block(records, config)?;

    let content = html! {
        header.page-header {
            h1 { (config.page.heading) }
            h3 { (config.page.subtitle) }
        }
        (controls(&config.labels, config.voice.default_preference()))
        hr;
        div id="content" {
            @for i in pager.page_range() {
                (record_frame(i, &records[i], &config.labels))
            }
        }
        (page_nav(&pager, &config.labels))
        script { (PreEscaped(script)) }
    };

    Ok(base_document(
        &config.page.title,
        &config.page.lang,
        &css,
        content,
    ))
}

/// Body of the `<script>` element: data, settings, then the player.
pub fn script_block(records: &[FlatRecord], config: &SiteConfig) -> Result<String, RenderError> {
    let settings = serde_json::to_string(&ScriptConfig::new(config))?
        .replace("</", "<\\/")
        .replace("<!--", "<\\u0021--");
    Ok(format!(
        "\nconst SHLOKAS = [\n{}\n];\n\nconst CONFIG = {};\n\n{}",
        render_entries(records),
        settings,
        PLAYER_JS
    ))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, lang: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body data-state="idle" data-page="0" {
                (content)
            }
        }
    }
}

/// Playback buttons and voice toggles. Handlers are attached by the script
/// through `data-action`.
fn controls(labels: &LabelsConfig, voice: VoicePreference) -> Markup {
    html! {
        div.controls {
            button.go data-action="start" { "Start" }
            button.halt data-action="stop" { "Stop" }
            button.action data-action="pause" { "Pause" }
            button.go data-action="resume" { "Resume" }
            button.action data-action="next" { "Next" }
            button.halt data-action="random" { "Random" }
            button.action data-action="read-page" { (labels.read) }
            button.halt data-action="exit" { "Exit" }
        }
        div.voice-controls {
            button.action id="voiceGender" data-action="toggle-gender" {
                "Voice: " (voice.gender.key())
            }
            button.action id="voiceSpeed" data-action="cycle-speed" {
                "Speed: " (voice.speed.key())
            }
        }
    }
}

/// One record, fields in display order. Mirrors `frame()` in the player script.
fn record_frame(index: usize, record: &FlatRecord, labels: &LabelsConfig) -> Markup {
    html! {
        div.frame data-index=(index) {
            (field(&labels.section, html! { span { (record.section) } }))
            (field(&labels.problem, html! { span { (record.problem) } }))
            (field(&labels.reference, html! { span { (record.reference) } }))
            (field(&labels.text, html! { pre { (record.text) } }))
            (field(&labels.meaning, html! { span { (clean_text(&record.meaning)) } }))
            (field(&labels.example, html! { span { (clean_text(&record.example)) } }))
        }
    }
}

fn field(label: &str, value: Markup) -> Markup {
    html! {
        div.field {
            b { (label) " " }
            (value)
        }
    }
}

fn page_nav(pager: &Pager, labels: &LabelsConfig) -> Markup {
    html! {
        nav.pager {
            button data-action="prev-page" { (labels.previous) }
            span id="pageInfo" { (pager.label()) }
            button data-action="next-page" { (labels.next) }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
