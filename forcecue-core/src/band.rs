use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::sample::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    Warning,
    Medium,
    High,
    Critical,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Warning, Band::Medium, Band::High, Band::Critical];

    /// `None` for unlabelled samples: they produce no alert.
    pub fn from_label(label: Label) -> Option<Self> {
        match label {
            Label::Red => Some(Band::Critical),
            Label::Yellow5 => Some(Band::High),
            Label::Yellow4 => Some(Band::Medium),
            Label::Yellow3 => Some(Band::Warning),
            Label::None => None,
        }
    }

    pub fn alert_message(&self) -> &'static str {
        match self {
            Band::Critical => "CRITICAL FORCE DETECTED",
            Band::High => "HIGH FORCE DETECTED",
            Band::Medium => "MEDIUM FORCE DETECTED",
            Band::Warning => "WARNING: Force Increasing",
        }
    }

    /// Alternating wait/vibrate durations in milliseconds.
    pub fn vibration_pattern(&self) -> &'static [u64] {
        match self {
            Band::Warning => &[0, 100],
            Band::Medium => &[0, 200, 100, 200],
            Band::High => &[0, 300, 100, 300],
            Band::Critical => &[0, 400, 200, 400, 200, 400],
        }
    }

    pub fn tempo(&self) -> Tempo {
        match self {
            Band::Warning => Tempo(150),
            Band::Medium => Tempo(200),
            Band::High => Tempo(300),
            Band::Critical => Tempo(400),
        }
    }
}

/// Beep repetition rate in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tempo(pub u32);

impl Tempo {
    pub fn bpm(&self) -> u32 {
        self.0
    }

    /// Time between beeps, `60 / bpm` seconds. A zero tempo is treated as 1 BPM.
    pub fn period(&self) -> Duration {
        Duration::from_nanos(60_000_000_000 / self.0.max(1) as u64)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo(60)
    }
}
