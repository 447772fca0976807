//! Synthesized stand-ins for the metronome sound clips.

use forcecue_core::SoundName;
use std::f32::consts::TAU;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
}

/// A short sequence of fixed-pitch segments, `(frequency Hz, length ms)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneProfile {
    pub wave: Wave,
    pub segments: &'static [(f32, u32)],
}

const FADE_MS: f32 = 4.0;

impl ToneProfile {
    pub fn for_sound(sound: SoundName) -> Self {
        match sound {
            SoundName::Scan => ToneProfile {
                wave: Wave::Sine,
                segments: &[(1320.0, 60)],
            },
            SoundName::LoudBeep => ToneProfile {
                wave: Wave::Square,
                segments: &[(1000.0, 140)],
            },
            SoundName::Electronic => ToneProfile {
                wave: Wave::Square,
                segments: &[(660.0, 50), (990.0, 50)],
            },
            SoundName::Gta => ToneProfile {
                wave: Wave::Sine,
                segments: &[(523.25, 60), (659.25, 60), (783.99, 90)],
            },
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.segments.iter().map(|&(_, ms)| ms as u64).sum())
    }

    pub fn total_samples(&self, sample_rate: u32) -> usize {
        (self.duration().as_secs_f64() * sample_rate as f64).round() as usize
    }

    /// Sample `index` at `sample_rate`, in `-1.0..=1.0`. Silent past the end.
    pub fn sample(&self, index: usize, sample_rate: u32) -> f32 {
        let t_ms = index as f32 * 1000.0 / sample_rate.max(1) as f32;
        let mut start = 0.0f32;
        for &(freq, ms) in self.segments {
            let len = ms as f32;
            if t_ms < start + len {
                let local = t_ms - start;
                let env = (local / FADE_MS).min((len - local) / FADE_MS).clamp(0.0, 1.0);
                let phase = (TAU * freq * t_ms / 1000.0).sin();
                let v = match self.wave {
                    Wave::Sine => phase,
                    Wave::Square => phase.signum() * 0.6,
                };
                return v * env;
            }
            start += len;
        }
        0.0
    }
}
