use forcecue_core::Tempo;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback loop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Period of the sample poll.
    pub poll_interval_ms: u64,
    /// Metronome tempo before any band has been seen.
    pub initial_tempo_bpm: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            initial_tempo_bpm: 60,
        }
    }
}

impl PlaybackConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn initial_tempo(&self) -> Tempo {
        Tempo(self.initial_tempo_bpm)
    }
}
