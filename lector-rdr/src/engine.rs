//! Speech engine seam
//!
//! The platform speech engine lives outside this crate. Hosts implement
//! [`SpeechEngine`] over whatever synthesis capability they have and
//! forward its callbacks back to the session as [`EngineEvent`]s. The
//! engine guarantees per-utterance event ordering: start, zero or more
//! boundaries, then end or error. Submitting a new utterance implicitly
//! cancels the prior one, which then errors with `Interrupted` instead
//! of ending.

use crate::error::ReaderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An entry from the engine's voice catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    /// Display label used by the voice selector: `"<name> (<lang>)"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.lang)
    }
}

/// A single request to vocalize one text string
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Voice name from the catalog; `None` selects the engine default
    pub voice: Option<String>,
}

/// Unit attached to a boundary callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryUnit {
    Word,
    Sentence,
}

/// Engine-reported failure codes
///
/// All codes are handled identically (reset to idle, nothing surfaced);
/// `Interrupted` in particular is the expected side effect of normal
/// cancel/restart flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineErrorCode {
    Interrupted,
    NotAllowed,
    AudioBusy,
    Other(String),
}

impl EngineErrorCode {
    /// Map a platform error-code string onto the known set
    pub fn from_code(code: &str) -> Self {
        match code {
            "interrupted" => Self::Interrupted,
            "not-allowed" => Self::NotAllowed,
            "audio-busy" => Self::AudioBusy,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Callback from the engine, delivered on the session's event queue
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Speech for the submitted utterance has started
    Started,
    /// Speech has reached `char_index` within the utterance text
    Boundary {
        unit: BoundaryUnit,
        char_index: usize,
    },
    /// The utterance finished normally
    Ended,
    /// The utterance failed or was cancelled
    Errored(EngineErrorCode),
    /// The voice catalog changed and should be re-read
    VoicesChanged,
}

/// Trait for speech engines
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Submit a new utterance, implicitly cancelling any prior one
    async fn submit(&self, utterance: &Utterance) -> Result<(), ReaderError>;

    /// Cancel the active utterance, if any
    async fn cancel(&self) -> Result<(), ReaderError>;

    /// Pause the active utterance
    async fn pause(&self) -> Result<(), ReaderError>;

    /// Resume a paused utterance
    async fn resume(&self) -> Result<(), ReaderError>;

    /// Read the voice catalog; may be empty before asynchronous
    /// population completes
    async fn list_voices(&self) -> Result<Vec<Voice>, ReaderError>;

    /// Check if the engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}

/// Silent engine for headless runs and examples
///
/// Accepts every request and produces no speech and no events.
#[derive(Debug, Default)]
pub struct NullEngine;

impl NullEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechEngine for NullEngine {
    async fn submit(&self, utterance: &Utterance) -> Result<(), ReaderError> {
        if utterance.text.is_empty() {
            return Err(ReaderError::Engine("Text cannot be empty".to_string()));
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<(), ReaderError> {
        Ok(())
    }

    async fn pause(&self) -> Result<(), ReaderError> {
        Ok(())
    }

    async fn resume(&self) -> Result<(), ReaderError> {
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, ReaderError> {
        Ok(Vec::new())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "null"
    }
}
