//! Floating player widget
//!
//! The widget itself is rendered by the host; this module derives the
//! complete snapshot it needs: status line, button enablement, voice
//! options, and slider position. Everything is recomputed from session
//! state on every refresh, never patched incrementally.

use crate::config::ReaderConfig;
use crate::engine::Voice;
use crate::page::AffordanceGlyph;
use crate::selection::Selection;
use crate::session::PlaybackState;
use serde::{Deserialize, Serialize};

pub const WIDGET_TITLE: &str = "TTS Reader";
pub const DEFAULT_VOICE_LABEL: &str = "Default Voice";
const NO_SELECTION_STATUS: &str = "No text selected";

/// Derived widget snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetView {
    pub visible: bool,
    pub title: String,
    pub status: String,
    pub play_enabled: bool,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
    /// Speed slider; enabled only at idle with a selection present
    pub speed_enabled: bool,
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub speed_step: f32,
    /// Label mirroring the slider value, e.g. `"1.5x"`
    pub speed_label: String,
    /// Voice selector; same enablement as the slider
    pub voice_enabled: bool,
    /// `"Default Voice"` followed by one label per catalog entry
    pub voice_options: Vec<String>,
    /// Selected catalog voice name; `None` is the default entry
    pub selected_voice: Option<String>,
    /// Glyph for the inline affordance
    pub affordance: AffordanceGlyphView,
}

/// Serializable mirror of the affordance glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceGlyphView {
    Play,
    Pause,
}

impl From<AffordanceGlyph> for AffordanceGlyphView {
    fn from(glyph: AffordanceGlyph) -> Self {
        match glyph {
            AffordanceGlyph::Play => Self::Play,
            AffordanceGlyph::Pause => Self::Pause,
        }
    }
}

/// Status line: the truncated selection text, or a fixed placeholder
pub fn status_line(selection: Option<&Selection>, truncate: usize) -> String {
    match selection {
        Some(selection) => {
            let count = selection.text.chars().count();
            if count > truncate {
                let short: String = selection.text.chars().take(truncate).collect();
                format!("Selected: {short}...")
            } else {
                format!("Selected: {}", selection.text)
            }
        }
        None => NO_SELECTION_STATUS.to_string(),
    }
}

/// Derive the widget snapshot from session state
pub fn derive(
    config: &ReaderConfig,
    state: PlaybackState,
    selection: Option<&Selection>,
    speed: f32,
    selected_voice: Option<&str>,
    voices: &[Voice],
    visible: bool,
) -> WidgetView {
    let has_text = selection.map(|s| !s.text.trim().is_empty()).unwrap_or(false);
    let playing = state == PlaybackState::Playing;
    let paused = state == PlaybackState::Paused;

    let mut voice_options = Vec::with_capacity(voices.len() + 1);
    voice_options.push(DEFAULT_VOICE_LABEL.to_string());
    voice_options.extend(voices.iter().map(Voice::label));

    WidgetView {
        visible,
        title: WIDGET_TITLE.to_string(),
        status: status_line(selection, config.status_truncate),
        play_enabled: has_text && !playing,
        pause_enabled: has_text && playing,
        stop_enabled: has_text && (playing || paused),
        speed_enabled: has_text && !playing && !paused,
        speed,
        min_speed: config.min_speed,
        max_speed: config.max_speed,
        speed_step: config.speed_step,
        speed_label: format!("{speed}x"),
        voice_enabled: has_text && !playing && !paused,
        voice_options,
        selected_voice: selected_voice.map(str::to_string),
        affordance: if playing {
            AffordanceGlyphView::Pause
        } else {
            AffordanceGlyphView::Play
        },
    }
}
