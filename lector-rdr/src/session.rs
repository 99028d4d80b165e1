//! Playback session
//!
//! One `ReaderSession` exists per page. It owns the selection, the
//! playback state machine, and the single live utterance, and drives
//! the page and the speech engine through their seams. Engine failures
//! are deliberately silent: every error code resets to idle and nothing
//! is surfaced (a late `interrupted` after a stop is normal traffic,
//! not a failure).

use crate::bridge::StatusReply;
use crate::config::ReaderConfig;
use crate::engine::{BoundaryUnit, EngineEvent, SpeechEngine, Utterance, Voice};
use crate::error::ReaderError;
use crate::highlight;
use crate::page::{AffordanceGlyph, PageAccess};
use crate::selection::{classify, ClickEvent, ClickOutcome, Selection};
use crate::widget::{self, WidgetView};
use lector_core::autoscroll_target;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Utterance lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// The per-page reader session
pub struct ReaderSession<P: PageAccess> {
    config: ReaderConfig,
    engine: Arc<dyn SpeechEngine>,
    page: P,
    state: PlaybackState,
    selection: Option<Selection>,
    /// The single live utterance; built on play from idle, dropped on
    /// stop/end/error
    utterance: Option<Utterance>,
    /// Last reported spoken offset
    char_index: usize,
    /// Persisted speed; survives across utterances within the session
    speed: f32,
    /// Chosen voice name; `None` is the engine default
    voice: Option<String>,
    voices: Vec<Voice>,
    widget_created: bool,
    widget_visible: bool,
}

impl<P: PageAccess> ReaderSession<P> {
    /// Create a new session over a page and an engine
    pub fn new(
        config: ReaderConfig,
        engine: Arc<dyn SpeechEngine>,
        page: P,
    ) -> Result<Self, ReaderError> {
        config.validate().map_err(ReaderError::Config)?;

        if !engine.is_available() {
            return Err(ReaderError::Engine(format!(
                "Speech engine '{}' not available",
                engine.name()
            )));
        }

        let speed = config.speed;
        Ok(Self {
            config,
            engine,
            page,
            state: PlaybackState::Idle,
            selection: None,
            utterance: None,
            char_index: 0,
            speed,
            voice: None,
            voices: Vec::new(),
            widget_created: false,
            widget_visible: false,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn utterance(&self) -> Option<&Utterance> {
        self.utterance.as_ref()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Start or resume speech for the current selection. No selection
    /// means no-op; already playing means no-op.
    pub async fn play(&mut self) {
        let Some(selection) = self.selection.clone() else {
            debug!("Play requested with no selection");
            return;
        };

        match self.state {
            PlaybackState::Playing => {}
            PlaybackState::Paused => {
                // The engine ignores mid-utterance rate changes; this
                // only keeps the held utterance in step with the slider.
                if let Some(utterance) = self.utterance.as_mut() {
                    utterance.rate = self.speed;
                }
                if let Err(e) = self.engine.resume().await {
                    warn!("Failed to resume engine: {}", e);
                }
                self.state = PlaybackState::Playing;
                self.sync_affordance();
            }
            PlaybackState::Idle => {
                let text = truncate_utterance(&selection.text, self.config.max_utterance_len);
                let voice = self
                    .voice
                    .clone()
                    .filter(|name| self.voices.iter().any(|v| &v.name == name));
                let utterance = Utterance {
                    text,
                    rate: self.speed,
                    pitch: self.config.pitch,
                    volume: self.config.volume,
                    voice,
                };

                // Drop any stray engine utterance before submitting
                if let Err(e) = self.engine.cancel().await {
                    warn!("Failed to cancel stray utterance: {}", e);
                }
                match self.engine.submit(&utterance).await {
                    Ok(()) => {
                        info!("Submitted utterance ({} bytes)", utterance.text.len());
                        // Playing is entered on the engine's start signal
                        self.utterance = Some(utterance);
                    }
                    Err(e) => {
                        warn!("Failed to submit utterance: {}", e);
                    }
                }
            }
        }
    }

    /// Pause speech; only meaningful while playing
    pub async fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        if let Err(e) = self.engine.pause().await {
            warn!("Failed to pause engine: {}", e);
        }
        self.state = PlaybackState::Paused;
        self.sync_affordance();
    }

    /// Full stop: cancel the engine, clear the highlight, reset the
    /// spoken offset. No-op when idle.
    pub async fn stop(&mut self) {
        if self.state == PlaybackState::Idle {
            return;
        }
        if let Err(e) = self.engine.cancel().await {
            warn!("Failed to cancel engine: {}", e);
        }
        if let Err(e) = self.page.clear_highlight() {
            warn!("Failed to clear highlight: {}", e);
        }
        self.utterance = None;
        self.char_index = 0;
        self.state = PlaybackState::Idle;
        self.sync_affordance();
    }

    /// Update the persisted speed. Only an utterance that has not been
    /// submitted yet (idle) picks the new rate up directly; otherwise
    /// it applies to the next play from idle.
    pub fn set_speed(&mut self, speed: f32) {
        let speed = self.config.clamp_speed(speed);
        self.speed = speed;
        if self.state == PlaybackState::Idle {
            if let Some(utterance) = self.utterance.as_mut() {
                utterance.rate = speed;
            }
        }
    }

    /// Choose a voice by catalog name (`None` = engine default).
    /// Rejected while playing or paused.
    pub fn set_voice(&mut self, name: Option<String>) {
        if self.state != PlaybackState::Idle {
            debug!("Ignoring voice change during playback");
            return;
        }
        let resolved = name.filter(|n| self.voices.iter().any(|v| &v.name == n));
        if let Some(utterance) = self.utterance.as_mut() {
            utterance.voice = resolved.clone();
        }
        self.voice = resolved;
    }

    /// Replace the voice catalog
    pub fn set_voices(&mut self, voices: Vec<Voice>) {
        debug!("Voice catalog updated ({} voices)", voices.len());
        self.voices = voices;
    }

    /// Process one engine callback
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Started => {
                if self.state == PlaybackState::Idle && self.utterance.is_some() {
                    self.state = PlaybackState::Playing;
                    self.sync_affordance();
                }
            }
            EngineEvent::Boundary {
                unit: BoundaryUnit::Word,
                char_index,
            } => self.on_word_boundary(char_index),
            EngineEvent::Boundary { .. } => {}
            EngineEvent::Ended => {
                if self.state == PlaybackState::Playing {
                    if let Err(e) = self.page.clear_highlight() {
                        warn!("Failed to clear highlight: {}", e);
                    }
                    self.utterance = None;
                    self.state = PlaybackState::Idle;
                    self.sync_affordance();
                }
            }
            EngineEvent::Errored(code) => match self.state {
                PlaybackState::Playing | PlaybackState::Paused => {
                    debug!("Engine error ({:?}), resetting to idle", code);
                    self.utterance = None;
                    self.state = PlaybackState::Idle;
                    self.sync_affordance();
                }
                // A late `interrupted` after stop lands here
                PlaybackState::Idle => {}
            },
            // Catalog re-reads are the adapter's job
            EngineEvent::VoicesChanged => {}
        }
    }

    /// Process a page click (capture phase)
    pub async fn handle_click(&mut self, click: ClickEvent) {
        match classify(&click) {
            ClickOutcome::Ignored => {}
            ClickOutcome::ToggleAffordance => {
                if self.state == PlaybackState::Playing {
                    self.pause().await;
                } else {
                    self.play().await;
                }
            }
            ClickOutcome::Select(selection) => {
                if self.state != PlaybackState::Idle {
                    self.stop().await;
                }
                if let Err(e) = self.page.clear_selection_mark() {
                    warn!("Failed to clear selection mark: {}", e);
                }
                if let Err(e) = self.page.mark_selected(selection.element) {
                    warn!("Failed to mark selection: {}", e);
                    // The old mark is already gone; drop the stale
                    // selection with it
                    self.selection = None;
                    return;
                }
                if let Err(e) = self.page.attach_affordance(selection.element) {
                    warn!("Failed to attach affordance: {}", e);
                }
                debug!("Selected {} ({} bytes)", selection.element, selection.text.len());
                self.selection = Some(selection);
                self.sync_affordance();
            }
        }
    }

    /// Lazily create and show the widget
    pub fn show_widget(&mut self) {
        self.widget_created = true;
        self.widget_visible = true;
    }

    /// Hide the widget (keeping it around), force-stopping playback
    pub async fn hide_widget(&mut self) {
        if !self.widget_created {
            return;
        }
        if self.state != PlaybackState::Idle {
            self.stop().await;
        }
        self.widget_visible = false;
    }

    /// Toggle widget visibility (the extension icon signal)
    pub async fn toggle_widget(&mut self) {
        if self.widget_created && self.widget_visible {
            self.hide_widget().await;
        } else {
            self.show_widget();
        }
    }

    pub fn widget_visible(&self) -> bool {
        self.widget_visible
    }

    /// Current widget snapshot, derived from session state
    pub fn widget_view(&self) -> WidgetView {
        widget::derive(
            &self.config,
            self.state,
            self.selection.as_ref(),
            self.speed,
            self.voice.as_deref(),
            &self.voices,
            self.widget_visible,
        )
    }

    /// Status payload for the extension shell
    pub fn status_reply(&self) -> StatusReply {
        StatusReply {
            status: widget::status_line(self.selection.as_ref(), self.config.status_truncate),
            playing: self.state == PlaybackState::Playing,
            paused: self.state == PlaybackState::Paused,
        }
    }

    fn on_word_boundary(&mut self, char_index: usize) {
        // Stray boundaries after a stop must not resurrect a highlight
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(selection) = self.selection.as_ref() else {
            return;
        };

        self.char_index = char_index;
        let word_length = highlight::word_length_at(&selection.text, char_index);
        let Some(layout) = highlight::layout(
            &selection.text,
            char_index,
            word_length,
            self.config.words_before,
            self.config.words_after,
        ) else {
            return;
        };

        let element = selection.element;
        if let Err(e) = self.page.apply_highlight(element, &layout) {
            warn!("Failed to render highlight: {}", e);
            return;
        }

        if let Some(metrics) = self.page.line_metrics() {
            let viewport = self.page.viewport();
            if let Some(target) = autoscroll_target(&metrics.rect, metrics.offset_top, &viewport) {
                self.page.scroll_to(target);
            }
        }
    }

    fn sync_affordance(&mut self) {
        let glyph = if self.state == PlaybackState::Playing {
            AffordanceGlyph::Pause
        } else {
            AffordanceGlyph::Play
        };
        if let Err(e) = self.page.set_affordance_glyph(glyph) {
            warn!("Failed to update affordance glyph: {}", e);
        }
    }
}

/// Cap utterance text at the configured byte length without breaking a
/// UTF-8 boundary
fn truncate_utterance(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    warn!("Selection text too long ({} bytes), truncating", text.len());
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_utterance_char_boundary() {
        let text = "aé"; // 'é' is two bytes starting at index 1
        assert_eq!(truncate_utterance(text, 2), "a");
        assert_eq!(truncate_utterance(text, 3), "aé");
    }
}
