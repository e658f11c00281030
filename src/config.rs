//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the content directory. The
//! defaults reproduce the page shipped in the Android app, so a content
//! directory without any config builds the same asset.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [page]
//! title = "AI Bhagavad Gita by Anurag Vasu Bharti"
//! heading = "AI Bhagwat Geeta by Anurag Vasu Bharti"
//! subtitle = "📘 भगवद गीता में अपनी समस्याओं का समाधान खोजें"
//! page_size = 2             # Shlokas per page
//! lang = "hi-IN"            # Document and narration language
//!
//! [playback]
//! dwell_seconds = 15        # Delay between automatic advances (1-120)
//!
//! [voice]
//! default_gender = "female" # female | male
//! default_speed = "medium"  # very_slow | slow | medium
//! female_keywords = [...]   # Voice-name fragments used to pick a voice
//! male_keywords = [...]
//!
//! [labels]                  # Display and spoken labels
//!
//! [colors]                  # Page palette
//!
//! [content]
//! shape_mode = "lenient"    # lenient: skip malformed sections | strict: fail
//!
//! [output]
//! path = "android/app/src/main/assets/html/gita_shlokas.html"
//! legacy_path = "android/app/src/main/assets/html/gita_problems.html"
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::flatten::ShapeMode;
use crate::voice::{VoiceGender, VoicePreference, VoiceSpeed};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document title, headings, page size and language.
    pub page: PageConfig,
    /// Sequential narration timing.
    pub playback: PlaybackConfig,
    /// Default voice selection and voice-name matching keywords.
    pub voice: VoiceConfig,
    /// Display and spoken labels.
    pub labels: LabelsConfig,
    /// Page palette.
    pub colors: ColorConfig,
    /// How malformed content is treated.
    pub content: ContentConfig,
    /// Where the document is written.
    pub output: OutputConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page.page_size == 0 {
            return Err(ConfigError::Validation(
                "page.page_size must be at least 1".into(),
            ));
        }
        if !(1..=120).contains(&self.playback.dwell_seconds) {
            return Err(ConfigError::Validation(
                "playback.dwell_seconds must be 1-120".into(),
            ));
        }
        if self.page.lang.trim().is_empty() {
            return Err(ConfigError::Validation("page.lang must not be empty".into()));
        }
        if self.output.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Dwell interval in milliseconds, as used by the page script.
    pub fn dwell_ms(&self) -> u64 {
        u64::from(self.playback.dwell_seconds) * 1000
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// `<title>` of the document.
    pub title: String,
    /// Main heading shown at the top of the page.
    pub heading: String,
    /// Line shown under the heading.
    pub subtitle: String,
    /// Number of shlokas per page.
    pub page_size: usize,
    /// BCP 47 language tag for the document and for narration.
    pub lang: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "AI Bhagavad Gita by Anurag Vasu Bharti".to_string(),
            heading: "AI Bhagwat Geeta by Anurag Vasu Bharti".to_string(),
            subtitle: "📘 भगवद गीता में अपनी समस्याओं का समाधान खोजें".to_string(),
            page_size: 2,
            lang: "hi-IN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Seconds between automatic advances during sequential narration.
    pub dwell_seconds: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { dwell_seconds: 15 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceConfig {
    /// Gender used until the reader picks one.
    pub default_gender: VoiceGender,
    /// Speed used until the reader picks one.
    pub default_speed: VoiceSpeed,
    /// Lowercase voice-name fragments that indicate a female voice.
    pub female_keywords: Vec<String>,
    /// Lowercase voice-name fragments that indicate a male voice.
    pub male_keywords: Vec<String>,
}

impl VoiceConfig {
    pub fn default_preference(&self) -> VoicePreference {
        VoicePreference {
            gender: self.default_gender,
            speed: self.default_speed,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        let words = |w: &[&str]| w.iter().map(|s| s.to_string()).collect();
        Self {
            default_gender: VoiceGender::Female,
            default_speed: VoiceSpeed::Medium,
            female_keywords: words(&["female", "woman", "lekha", "swara", "kalpana", "heera"]),
            male_keywords: words(&["male", "man", "hemant", "madhur", "ravi"]),
        }
    }
}

/// Labels shown next to each field, and spoken before narrated fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    pub section: String,
    pub problem: String,
    pub reference: String,
    pub text: String,
    pub meaning: String,
    pub example: String,
    pub spoken_text: String,
    pub spoken_meaning: String,
    pub spoken_example: String,
    pub previous: String,
    pub next: String,
    pub read: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            section: "📗 अनुभाग:".to_string(),
            problem: "🧩 समस्या:".to_string(),
            reference: "📌 संदर्भ:".to_string(),
            text: "📜 संस्कृत श्लोक:".to_string(),
            meaning: "📝 अर्थ:".to_string(),
            example: "🌿 उदाहरण:".to_string(),
            spoken_text: "श्लोक".to_string(),
            spoken_meaning: "अर्थ".to_string(),
            spoken_example: "उदाहरण".to_string(),
            previous: "⬅ पिछला".to_string(),
            next: "अगला ➡".to_string(),
            read: "🔊 AI पढ़े".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background.
    pub background: String,
    /// Background of each shloka frame.
    pub frame: String,
    pub text: String,
    /// Frame border.
    pub border: String,
    /// Background of the shloka currently being narrated.
    pub highlight: String,
    /// Start / Resume buttons.
    pub go: String,
    /// Stop / Random / Exit buttons.
    pub halt: String,
    /// Read, Next and voice buttons.
    pub action: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#ff9800".to_string(),
            frame: "#ffffff".to_string(),
            text: "#111111".to_string(),
            border: "#000000".to_string(),
            highlight: "#fff3c4".to_string(),
            go: "#008000".to_string(),
            halt: "#ff0000".to_string(),
            action: "#007bff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// `lenient` skips malformed sections, `strict` fails the build.
    pub shape_mode: ShapeMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the generated document.
    pub path: String,
    /// Superseded output removed before writing, if present.
    pub legacy_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "android/app/src/main/assets/html/gita_shlokas.html".to_string(),
            legacy_path: Some("android/app/src/main/assets/html/gita_problems.html".to_string()),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// A content path that is a single JSON file looks for `config.toml` next to
/// it. Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(content: &Path) -> Result<SiteConfig, ConfigError> {
    let dir = if content.is_file() {
        content.parent().unwrap_or(Path::new("."))
    } else {
        content
    };
    resolve_config(stock_defaults_value()?, load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# gita-pages Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the content directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Page
# ---------------------------------------------------------------------------
[page]
title = "AI Bhagavad Gita by Anurag Vasu Bharti"
heading = "AI Bhagwat Geeta by Anurag Vasu Bharti"
subtitle = "📘 भगवद गीता में अपनी समस्याओं का समाधान खोजें"

# Shlokas shown per page.
page_size = 2

# Language of the document and of narration.
lang = "hi-IN"

# ---------------------------------------------------------------------------
# Sequential narration
# ---------------------------------------------------------------------------
[playback]
# Seconds spent on each shloka before moving to the next one (1-120).
dwell_seconds = 15

# ---------------------------------------------------------------------------
# Voice
# ---------------------------------------------------------------------------
[voice]
# female | male
default_gender = "female"

# very_slow | slow | medium
default_speed = "medium"

# Lowercase fragments of voice names, used when the app shell does not
# provide narration and the browser's own voices are used instead.
female_keywords = ["female", "woman", "lekha", "swara", "kalpana", "heera"]
male_keywords = ["male", "man", "hemant", "madhur", "ravi"]

# ---------------------------------------------------------------------------
# Labels
# ---------------------------------------------------------------------------
[labels]
section = "📗 अनुभाग:"
problem = "🧩 समस्या:"
reference = "📌 संदर्भ:"
text = "📜 संस्कृत श्लोक:"
meaning = "📝 अर्थ:"
example = "🌿 उदाहरण:"

# Spoken before each narrated field.
spoken_text = "श्लोक"
spoken_meaning = "अर्थ"
spoken_example = "उदाहरण"

previous = "⬅ पिछला"
next = "अगला ➡"
read = "🔊 AI पढ़े"

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#ff9800"
frame = "#ffffff"
text = "#111111"
border = "#000000"
highlight = "#fff3c4"   # Shloka being narrated
go = "#008000"          # Start, Resume
halt = "#ff0000"        # Stop, Random, Exit
action = "#007bff"      # Read, Next, voice toggles

# ---------------------------------------------------------------------------
# Content
# ---------------------------------------------------------------------------
[content]
# lenient: sections matching neither shape are skipped and reported.
# strict:  any such section fails the build.
shape_mode = "lenient"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
path = "android/app/src/main/assets/html/gita_shlokas.html"

# Superseded file removed (best effort) before writing. Comment out to keep it.
legacy_path = "android/app/src/main/assets/html/gita_problems.html"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-frame: {frame};
    --color-text: {text};
    --color-border: {border};
    --color-highlight: {highlight};
    --color-go: {go};
    --color-halt: {halt};
    --color-action: {action};
}}"#,
        background = colors.background,
        frame = colors.frame,
        text = colors.text,
        border = colors.border,
        highlight = colors.highlight,
        go = colors.go,
        halt = colors.halt,
        action = colors.action,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_shipped_page() {
        let config = SiteConfig::default();
        assert_eq!(config.page.page_size, 2);
        assert_eq!(config.page.lang, "hi-IN");
        assert_eq!(config.playback.dwell_seconds, 15);
        assert_eq!(config.colors.background, "#ff9800");
        assert!(config.output.path.ends_with("gita_shlokas.html"));
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let from_stock = toml::Value::try_from(parsed).unwrap();
        let defaults = stock_defaults_value().unwrap();
        assert_eq!(from_stock, defaults);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[page]
page_size = 5

[colors]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.page.page_size, 5);
        assert_eq!(config.colors.background, "#fafafa");
        // Defaults preserved
        assert_eq!(config.page.lang, "hi-IN");
        assert_eq!(config.colors.frame, "#ffffff");
    }

    #[test]
    fn parse_voice_choices() {
        let toml = r#"
[voice]
default_gender = "male"
default_speed = "very_slow"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        let pref = config.voice.default_preference();
        assert_eq!(pref.gender, VoiceGender::Male);
        assert_eq!(pref.speed, VoiceSpeed::VerySlow);
    }

    #[test]
    fn parse_strict_shape_mode() {
        let config: SiteConfig = toml::from_str("[content]\nshape_mode = \"strict\"").unwrap();
        assert_eq!(config.content.shape_mode, ShapeMode::Strict);
    }

    #[test]
    fn dwell_ms_from_seconds() {
        let mut config = SiteConfig::default();
        config.playback.dwell_seconds = 12;
        assert_eq!(config.dwell_ms(), 12_000);
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.background = "#123456".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #123456"));
        assert!(css.contains("--color-highlight: #fff3c4"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.page.page_size, 2);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[playback]\ndwell_seconds = 12\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.playback.dwell_seconds, 12);
        assert_eq!(config.page.page_size, 2);
    }

    #[test]
    fn load_config_next_to_json_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[page]\npage_size = 4\n").unwrap();
        let sections = tmp.path().join("sections.json");
        fs::write(&sections, "[]").unwrap();

        let config = load_config(&sections).unwrap();
        assert_eq!(config.page.page_size, 4);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[page]\nper_page = 3\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[fonts]\npath = \"x.ttf\"");
        assert!(result.is_err());
    }

    #[test]
    fn legacy_path_can_be_overridden() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value =
            toml::from_str("[output]\nlegacy_path = \"old.html\"").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.output.legacy_path.as_deref(), Some("old.html"));
        assert!(config.output.path.ends_with("gita_shlokas.html"));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[page]\ntitle = \"a\"\npage_size = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[page]\npage_size = 6").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["page"]["title"].as_str(), Some("a"));
        assert_eq!(merged["page"]["page_size"].as_integer(), Some(6));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("k = [\"a\", \"b\"]").unwrap();
        let overlay: toml::Value = toml::from_str("k = [\"c\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["k"].as_array().map(Vec::len), Some(1));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_page_size_zero() {
        let mut config = SiteConfig::default();
        config.page.page_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_dwell_bounds() {
        let mut config = SiteConfig::default();
        config.playback.dwell_seconds = 0;
        assert!(config.validate().is_err());
        config.playback.dwell_seconds = 121;
        assert!(config.validate().is_err());
        config.playback.dwell_seconds = 120;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_output_path() {
        let mut config = SiteConfig::default();
        config.output.path = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_runs_on_resolve() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[page]\npage_size = 0").unwrap();
        assert!(matches!(
            resolve_config(base, Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }
}
