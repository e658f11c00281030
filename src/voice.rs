//! Narration voice choices and voice selection.
//!
//! The reader picks a gender and a speed on the page; both are persisted in
//! the WebView's `localStorage` and passed to the app shell's `speak` bridge.
//! When the shell is absent the page falls back to the browser's own voices,
//! and has to pick one. That choice is a [`VoiceSelector`]: matching on voice
//! names is inherently best-effort, so the strategy is pluggable and its
//! keywords come from config rather than being baked in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender of the narration voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceGender {
    #[default]
    Female,
    Male,
}

impl VoiceGender {
    /// Storage/bridge key (`female` / `male`).
    pub fn key(self) -> &'static str {
        match self {
            VoiceGender::Female => "female",
            VoiceGender::Male => "male",
        }
    }

    /// The other gender, used by the page's toggle button.
    pub fn toggled(self) -> Self {
        match self {
            VoiceGender::Female => VoiceGender::Male,
            VoiceGender::Male => VoiceGender::Female,
        }
    }
}

/// Narration speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceSpeed {
    VerySlow,
    Slow,
    #[default]
    Medium,
}

impl VoiceSpeed {
    pub const ALL: [VoiceSpeed; 3] = [VoiceSpeed::VerySlow, VoiceSpeed::Slow, VoiceSpeed::Medium];

    /// Playback-rate multiplier relative to the platform's normal rate.
    pub fn rate(self) -> f32 {
        match self {
            VoiceSpeed::VerySlow => 0.72,
            VoiceSpeed::Slow => 0.82,
            VoiceSpeed::Medium => 0.95,
        }
    }

    /// Storage/bridge key (`very_slow` / `slow` / `medium`).
    pub fn key(self) -> &'static str {
        match self {
            VoiceSpeed::VerySlow => "very_slow",
            VoiceSpeed::Slow => "slow",
            VoiceSpeed::Medium => "medium",
        }
    }

    /// Next speed in the page's cycle button (very_slow → slow → medium → very_slow).
    pub fn cycled(self) -> Self {
        match self {
            VoiceSpeed::VerySlow => VoiceSpeed::Slow,
            VoiceSpeed::Slow => VoiceSpeed::Medium,
            VoiceSpeed::Medium => VoiceSpeed::VerySlow,
        }
    }
}

/// The reader's current voice selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePreference {
    pub gender: VoiceGender,
    pub speed: VoiceSpeed,
}

impl fmt::Display for VoicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} voice, {} ({}x)",
            self.gender.key(),
            self.speed.key(),
            self.speed.rate()
        )
    }
}

/// A voice offered by the platform speech engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `hi-IN`.
    pub lang: String,
}

/// Picks the best available voice for a language and gender.
pub trait VoiceSelector {
    fn best_voice<'a>(&self, voices: &'a [Voice], lang: &str, gender: VoiceGender)
    -> Option<&'a Voice>;
}

/// Default strategy: narrow to the language, then prefer a name matching the
/// gender's keywords.
///
/// Language narrowing takes exact tag matches (`hi-IN`), falling back to the
/// primary subtag (`hi`). A voice counts as male only when it matches a male
/// keyword and no female keyword, since `"female"` contains `"male"`. With no
/// keyword match the first voice of the language wins; with no voice in the
/// language at all there is no choice and the engine default is used.
#[derive(Debug, Clone)]
pub struct KeywordVoiceSelector {
    pub female_keywords: Vec<String>,
    pub male_keywords: Vec<String>,
}

impl KeywordVoiceSelector {
    pub fn new(female_keywords: Vec<String>, male_keywords: Vec<String>) -> Self {
        Self {
            female_keywords,
            male_keywords,
        }
    }

    fn matches(&self, voice: &Voice, gender: VoiceGender) -> bool {
        let name = voice.name.to_lowercase();
        let hit = |words: &[String]| words.iter().any(|w| name.contains(w.as_str()));
        match gender {
            VoiceGender::Female => hit(&self.female_keywords),
            VoiceGender::Male => hit(&self.male_keywords) && !hit(&self.female_keywords),
        }
    }
}

impl VoiceSelector for KeywordVoiceSelector {
    fn best_voice<'a>(
        &self,
        voices: &'a [Voice],
        lang: &str,
        gender: VoiceGender,
    ) -> Option<&'a Voice> {
        let wanted = normalize_lang(lang);
        let primary = wanted.split('-').next().unwrap_or_default().to_string();

        let mut candidates: Vec<&Voice> = voices
            .iter()
            .filter(|v| normalize_lang(&v.lang) == wanted)
            .collect();
        if candidates.is_empty() {
            candidates = voices
                .iter()
                .filter(|v| normalize_lang(&v.lang).split('-').next() == Some(primary.as_str()))
                .collect();
        }

        candidates
            .iter()
            .find(|v| self.matches(v, gender))
            .or_else(|| candidates.first())
            .copied()
    }
}

/// Android reports `hi_IN`, browsers `hi-IN`; compare case-insensitively.
fn normalize_lang(lang: &str) -> String {
    lang.trim().replace('_', "-").to_lowercase()
}
