//! Configuration for the page reader

use serde::{Deserialize, Serialize};

/// Reader configuration
///
/// Defaults mirror the player UI: speed slider 0.5x-2.5x in 0.1 steps
/// starting at 1.5x, fixed pitch/volume, and a highlight window of two
/// words before through seven words after the spoken word.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Initial speech rate (persists across utterances within a session)
    pub speed: f32,

    /// Lower bound of the speed slider
    pub min_speed: f32,

    /// Upper bound of the speed slider
    pub max_speed: f32,

    /// Slider step
    pub speed_step: f32,

    /// Utterance pitch (the player does not expose a pitch control)
    pub pitch: f32,

    /// Utterance volume (the player does not expose a volume control)
    pub volume: f32,

    /// Words included in the line window before the spoken word
    pub words_before: usize,

    /// Words included in the line window after the spoken word
    pub words_after: usize,

    /// Status line truncation length, in characters
    pub status_truncate: usize,

    /// Maximum utterance text length in bytes
    pub max_utterance_len: usize,

    /// Delay before re-polling an empty voice catalog, in milliseconds
    pub voice_retry_delay_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            min_speed: 0.5,
            max_speed: 2.5,
            speed_step: 0.1,
            pitch: 1.0,
            volume: 1.0,
            words_before: 2,
            words_after: 7,
            status_truncate: 50,
            max_utterance_len: 100_000,
            voice_retry_delay_ms: 1000,
        }
    }
}

impl ReaderConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_speed <= 0.0 {
            return Err("Minimum speed must be greater than 0".to_string());
        }

        if self.max_speed < self.min_speed {
            return Err("Maximum speed cannot be less than minimum speed".to_string());
        }

        // The platform engine nominally accepts 0.1-10.0
        if self.max_speed > 10.0 {
            return Err("Maximum speed too large (max 10.0)".to_string());
        }

        if !(self.min_speed..=self.max_speed).contains(&self.speed) {
            return Err(format!(
                "Speed must be between {} and {}",
                self.min_speed, self.max_speed
            ));
        }

        if self.speed_step <= 0.0 {
            return Err("Speed step must be greater than 0".to_string());
        }

        if !(0.0..=2.0).contains(&self.pitch) {
            return Err("Pitch must be between 0.0 and 2.0".to_string());
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err("Volume must be between 0.0 and 1.0".to_string());
        }

        if self.words_before > 100 || self.words_after > 100 {
            return Err("Line window too large (max 100 words each side)".to_string());
        }

        if self.status_truncate == 0 {
            return Err("Status truncation length must be greater than 0".to_string());
        }

        if self.max_utterance_len == 0 {
            return Err("Maximum utterance length must be greater than 0".to_string());
        }

        const MAX_UTTERANCE_LEN: usize = 1_000_000;
        if self.max_utterance_len > MAX_UTTERANCE_LEN {
            return Err(format!(
                "Maximum utterance length too large (max {} bytes)",
                MAX_UTTERANCE_LEN
            ));
        }

        if self.voice_retry_delay_ms > 60_000 {
            return Err("Voice retry delay too large (max 60000 ms)".to_string());
        }

        Ok(())
    }

    /// Clamp a requested speed into the slider range
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.min_speed, self.max_speed)
    }
}
